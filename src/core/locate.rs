//! Field location lookup inside dictionary sources.
//!
//! Used by go-to-definition to land on the exact property a read refers to,
//! either in a JSON dictionary or in a content declaration module. A lookup
//! never guesses: a segment missing at any level is a miss.

use std::{fs, path::Path};

use swc_ecma_ast::{
    Decl, Expr, ModuleDecl, ModuleItem, ObjectLit, Pat, Prop, PropName, PropOrSpread, Stmt,
};

use crate::core::{
    analysis::helpers::{prop_name_str, unwrap_ts_expr},
    data::{FieldPath, LineIndex, Position},
    parsers::{json::find_key_offset, script::parse_source},
};

/// Extensions searched as JSON-like text.
pub const STRUCTURED_EXTENSIONS: &[&str] = &["json", "json5", "jsonc"];

fn is_structured(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| STRUCTURED_EXTENSIONS.contains(&ext))
}

/// Reads `path` and locates `field_path` in it.
///
/// Unreadable or unparsable files are logged and reported as a miss.
pub fn locate_field(path: &Path, field_path: &FieldPath) -> Option<Position> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read file to locate field");
            return None;
        }
    };
    locate_in_text(path, &text, field_path)
}

/// Locates `field_path` in `text`, using `path` only to pick the format.
pub fn locate_in_text(path: &Path, text: &str, field_path: &FieldPath) -> Option<Position> {
    if field_path.is_root() {
        return None;
    }
    if is_structured(path) {
        let offset = find_key_offset(text, field_path)?;
        return Some(LineIndex::new(text).position_at(offset));
    }

    let parsed = match parse_source(path, text) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot parse file to locate field");
            return None;
        }
    };

    let root = exported_object(&parsed.module.body)?;
    let mut current = root;
    let mut found = None;
    for (i, segment) in field_path.segments().iter().enumerate() {
        let (name, value) = find_property(current, segment)?;
        found = Some(name);
        if i + 1 < field_path.len() {
            current = object_value(value?)?;
        }
    }
    found.map(|name| parsed.position(swc_common::Spanned::span(name).lo))
}

/// The default-exported object literal: `export default { ... }`, the same
/// wrapped in `satisfies`/`as`, or an identifier bound to one of those.
fn exported_object(body: &[ModuleItem]) -> Option<&ObjectLit> {
    let exported = body.iter().find_map(|item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => Some(&*export.expr),
        _ => None,
    })?;

    match unwrap_ts_expr(exported) {
        Expr::Object(obj) => Some(obj),
        Expr::Ident(ident) => {
            let init = top_level_initializer(body, ident.sym.as_str())?;
            match unwrap_ts_expr(init) {
                Expr::Object(obj) => Some(obj),
                _ => None,
            }
        }
        _ => None,
    }
}

fn top_level_initializer<'m>(body: &'m [ModuleItem], name: &str) -> Option<&'m Expr> {
    body.iter().find_map(|item| {
        let var = match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                Decl::Var(var) => var,
                _ => return None,
            },
            _ => return None,
        };
        var.decls.iter().find_map(|decl| match &decl.name {
            Pat::Ident(binding) if binding.id.sym.as_str() == name => decl.init.as_deref(),
            _ => None,
        })
    })
}

/// Property named `segment` and its value (none for shorthand or methods).
fn find_property<'o>(obj: &'o ObjectLit, segment: &str) -> Option<(&'o PropName, Option<&'o Expr>)> {
    obj.props.iter().find_map(|prop| {
        let PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        match &**prop {
            Prop::KeyValue(kv) if prop_name_str(&kv.key).as_deref() == Some(segment) => {
                Some((&kv.key, Some(&*kv.value)))
            }
            Prop::Method(method) if prop_name_str(&method.key).as_deref() == Some(segment) => {
                Some((&method.key, None))
            }
            _ => None,
        }
    })
}

/// Object literal a property value descends into, looking through
/// single-argument wrapper calls such as `t({ ... })`.
fn object_value(value: &Expr) -> Option<&ObjectLit> {
    match unwrap_ts_expr(value) {
        Expr::Object(obj) => Some(obj),
        Expr::Call(call) => match call.args.first().map(|arg| unwrap_ts_expr(&arg.expr)) {
            Some(Expr::Object(obj)) if call.args.len() == 1 => Some(obj),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const DECLARATION: &str = r#"import { t, type Dictionary } from "intlayer";

const appContent = {
  key: "app",
  content: {
    title: t({ en: "Title", fr: "Titre" }),
    hero: {
      title: "Hero",
    },
  },
} satisfies Dictionary;

export default appContent;
"#;

    fn locate(path: &str, text: &str, dotted: &str) -> Option<Position> {
        locate_in_text(Path::new(path), text, &FieldPath::parse(dotted))
    }

    #[test]
    fn test_script_named_export_with_satisfies() {
        assert_eq!(locate("app.content.ts", DECLARATION, "content"), Some(Position::new(4, 2)));
        assert_eq!(locate("app.content.ts", DECLARATION, "content.title"), Some(Position::new(5, 4)));
        assert_eq!(
            locate("app.content.ts", DECLARATION, "content.hero.title"),
            Some(Position::new(7, 6))
        );
    }

    #[test]
    fn test_script_unwraps_translation_calls() {
        assert_eq!(
            locate("app.content.ts", DECLARATION, "content.title.fr"),
            Some(Position::new(5, 28))
        );
    }

    #[test]
    fn test_script_direct_default_export() {
        let text = "export default {\n  key: 'a',\n  content: { label: 'x' },\n} as const;\n";
        assert_eq!(locate("a.content.tsx", text, "content.label"), Some(Position::new(2, 13)));
    }

    #[test]
    fn test_script_missing_segments_are_misses() {
        assert_eq!(locate("app.content.ts", DECLARATION, "content.missing"), None);
        assert_eq!(locate("app.content.ts", DECLARATION, "content.hero.title.deeper"), None);
        assert_eq!(locate("app.content.ts", DECLARATION, ""), None);
        assert_eq!(locate("app.content.ts", "const a = 1;", "content"), None);
    }

    #[test]
    fn test_json_lookup() {
        let text = "{\n  \"content\": {\n    \"title\": \"A\"\n  }\n}\n";
        assert_eq!(locate("app.json", text, "content.title"), Some(Position::new(2, 4)));
        assert_eq!(locate("app.json", text, "content.other"), None);
    }

    #[test]
    fn test_prefix_position_precedes_leaf() {
        let paths = ["content", "content.hero", "content.hero.title"];
        let positions: Vec<Position> = paths
            .iter()
            .map(|p| locate("app.content.ts", DECLARATION, p).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_locate_field_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.content.ts");
        std::fs::write(&path, DECLARATION).unwrap();
        assert_eq!(
            locate_field(&path, &FieldPath::parse("content.title")),
            Some(Position::new(5, 4))
        );
        assert_eq!(locate_field(&dir.path().join("missing.ts"), &FieldPath::parse("a")), None);
    }
}
