//! Content declaration files: the `{ key, content }` object a dictionary is
//! declared with (`app.content.ts`, `page.content.tsx`, ...).

use swc_ecma_ast::{Expr, KeyValueProp, ObjectLit, Prop, PropOrSpread};
use swc_ecma_visit::{Visit, VisitWith};

use super::helpers::{prop_name_str, string_literal, unwrap_ts_expr};
use crate::core::{
    data::{FieldPath, Position, Range},
    parsers::script::ParsedSource,
};

/// A property declared under `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredField {
    pub path: FieldPath,
    /// Range of the property name.
    pub range: Range,
    /// Whether the value is a nested object of further fields.
    pub is_group: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDeclaration {
    pub key: String,
    /// Range of the whole `key: "..."` property.
    pub key_range: Range,
    /// Every field in declaration order; groups precede their children.
    pub fields: Vec<DeclaredField>,
}

impl ContentDeclaration {
    /// Whether `position` is on the `key` property (name or value).
    pub fn is_on_key(&self, position: Position) -> bool {
        self.key_range.contains(position)
    }

    /// Field whose name is under `position`.
    pub fn field_at(&self, position: Position) -> Option<&DeclaredField> {
        self.fields.iter().find(|field| field.range.contains(position))
    }
}

/// Reads the first object literal in the file that declares both `key` (as a
/// string) and `content`.
pub fn read_declaration(parsed: &ParsedSource) -> Option<ContentDeclaration> {
    let mut finder = DeclarationFinder {
        parsed,
        found: None,
    };
    parsed.module.visit_with(&mut finder);
    finder.found
}

struct DeclarationFinder<'a> {
    parsed: &'a ParsedSource,
    found: Option<ContentDeclaration>,
}

impl Visit for DeclarationFinder<'_> {
    fn visit_object_lit(&mut self, node: &ObjectLit) {
        if self.found.is_some() {
            return;
        }
        if let Some(declaration) = read_object(self.parsed, node) {
            self.found = Some(declaration);
            return;
        }
        node.visit_children_with(self);
    }
}

fn key_value<'o>(obj: &'o ObjectLit, name: &str) -> Option<&'o KeyValueProp> {
    obj.props.iter().find_map(|prop| match prop {
        PropOrSpread::Prop(prop) => match &**prop {
            Prop::KeyValue(kv) if prop_name_str(&kv.key).as_deref() == Some(name) => Some(kv),
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    })
}

fn read_object(parsed: &ParsedSource, obj: &ObjectLit) -> Option<ContentDeclaration> {
    let key_prop = key_value(obj, "key")?;
    let content_prop = key_value(obj, "content")?;
    let key = string_literal(&key_prop.value)?;

    let key_span = swc_common::Span::new(
        swc_common::Spanned::span(&key_prop.key).lo,
        swc_common::Spanned::span(&*key_prop.value).hi,
    );

    let mut fields = Vec::new();
    if let Expr::Object(content) = unwrap_ts_expr(&content_prop.value) {
        collect_fields(parsed, content, &FieldPath::root(), &mut fields);
    }

    Some(ContentDeclaration {
        key,
        key_range: parsed.range(key_span),
        fields,
    })
}

/// Enumerates the fields of a content object. Nested objects are groups and
/// are descended into; anything else (translations, wrapper calls, literals)
/// is a leaf.
fn collect_fields(
    parsed: &ParsedSource,
    obj: &ObjectLit,
    prefix: &FieldPath,
    out: &mut Vec<DeclaredField>,
) {
    for prop in &obj.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let Prop::KeyValue(kv) = &**prop else {
            continue;
        };
        let Some(name) = prop_name_str(&kv.key) else {
            continue;
        };
        let path = prefix.child(name);
        let range = parsed.range(swc_common::Spanned::span(&kv.key));

        match unwrap_ts_expr(&kv.value) {
            Expr::Object(nested) => {
                out.push(DeclaredField {
                    path: path.clone(),
                    range,
                    is_group: true,
                });
                collect_fields(parsed, nested, &path, out);
            }
            _ => out.push(DeclaredField {
                path,
                range,
                is_group: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::script::parse_source;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    const DECLARATION: &str = r#"import { t, type Dictionary } from "intlayer";

const appContent = {
  key: "app",
  content: {
    title: t({ en: "Title", fr: "Titre" }),
    hero: {
      subtitle: "Sub",
      "cta-label": t({ en: "Go" }),
    },
    count: 3,
  },
} satisfies Dictionary;

export default appContent;
"#;

    fn declaration() -> ContentDeclaration {
        let parsed = parse_source(Path::new("app.content.ts"), DECLARATION).unwrap();
        read_declaration(&parsed).unwrap()
    }

    #[test]
    fn test_reads_key_and_fields() {
        let declaration = declaration();
        assert_eq!(declaration.key, "app");

        let fields: Vec<(String, bool)> = declaration
            .fields
            .iter()
            .map(|f| (f.path.to_string(), f.is_group))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("title".to_string(), false),
                ("hero".to_string(), true),
                ("hero.subtitle".to_string(), false),
                ("hero.cta-label".to_string(), false),
                ("count".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_field_ranges_cover_names() {
        let declaration = declaration();
        let title = &declaration.fields[0];
        assert_eq!(title.range.start, Position::new(5, 4));
        assert_eq!(title.range.end, Position::new(5, 9));

        assert_eq!(
            declaration.field_at(Position::new(5, 6)).map(|f| f.path.to_string()),
            Some("title".to_string())
        );
        assert!(declaration.field_at(Position::new(5, 20)).is_none());
    }

    #[test]
    fn test_key_range_covers_name_and_value() {
        let declaration = declaration();
        assert!(declaration.is_on_key(Position::new(3, 2)));
        assert!(declaration.is_on_key(Position::new(3, 8)));
        assert!(!declaration.is_on_key(Position::new(4, 2)));
    }

    #[test]
    fn test_non_declaration_files() {
        let parsed = parse_source(Path::new("a.ts"), "const a = { key: 1, content: {} };").unwrap();
        assert!(read_declaration(&parsed).is_none());

        let parsed = parse_source(Path::new("a.ts"), r#"const a = { key: "x" };"#).unwrap();
        assert!(read_declaration(&parsed).is_none());
    }
}
