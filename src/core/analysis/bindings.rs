//! Lexical binding table for one parsed file.
//!
//! Records every declared name with the scope it lives in, so a reference can
//! be resolved to its declaration without a type checker. Names bound from an
//! accessor call (directly or through destructuring) remember the call and the
//! content path their value comes from.

use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, CatchClause, ClassDecl, FnDecl, ForInStmt, ForOfStmt, ForStmt, Function,
    ImportDecl, ImportSpecifier, Module, ModuleExportName, ObjectPatProp, Pat, VarDecl,
    VarDeclKind,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::helpers::{AccessorCall, initializer_accessor_call, prop_name_str};
use crate::core::{data::FieldPath, markup::Dialect, parsers::script::ParsedSource};
use crate::utils::normalize_case;

pub type ScopeId = usize;

#[derive(Debug, Clone)]
pub struct Scope {
    pub span: Span,
    pub parent: Option<ScopeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// Bound from an accessor call. `path` is the content path selected by
    /// destructuring (empty for a plain identifier) and `site` the span of
    /// the property name that selected it.
    Accessor {
        call: AccessorCall,
        path: FieldPath,
        site: Span,
    },
    /// Any other variable.
    Local,
    /// Imported name.
    Import { imported: String, source: String },
    Param,
    /// Function or class declaration.
    Declaration,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    /// Span of the declaring identifier.
    pub span: Span,
    pub scope: ScopeId,
    pub kind: BindingKind,
}

impl Binding {
    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, BindingKind::Accessor { .. })
    }
}

/// All bindings of a module, with their scopes.
#[derive(Debug, Default)]
pub struct BindingTable {
    scopes: Vec<Scope>,
    bindings: Vec<Binding>,
    /// Svelte reads stores as `$name`.
    store_prefix: bool,
}

impl BindingTable {
    pub fn build(parsed: &ParsedSource) -> Self {
        let mut table = Self::from_module(&parsed.module);
        table.store_prefix = parsed.dialect == Dialect::Svelte;
        table
    }

    fn from_module(module: &Module) -> Self {
        let mut collector = BindingCollector {
            table: BindingTable::default(),
            stack: Vec::new(),
            function_stack: Vec::new(),
        };
        let root = collector.push_scope(module.span, true);
        module.visit_children_with(&mut collector);
        collector.pop_scope(root);
        collector.table
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    /// Innermost scope containing `pos`.
    pub fn scope_at(&self, pos: BytePos) -> ScopeId {
        self.scopes
            .iter()
            .enumerate()
            .filter(|(_, s)| s.span.lo <= pos && pos < s.span.hi)
            .min_by_key(|(_, s)| s.span.hi.0 - s.span.lo.0)
            .map(|(id, _)| id)
            .unwrap_or(0)
    }

    /// Resolves `name` as referenced at `pos`, walking scopes outward.
    ///
    /// When a scope declares the name more than once, the last declaration
    /// before `pos` wins.
    pub fn lookup(&self, name: &str, pos: BytePos) -> Option<&Binding> {
        let mut scope = Some(self.scope_at(pos));
        while let Some(id) = scope {
            let mut candidates = self
                .bindings
                .iter()
                .filter(|b| b.scope == id && b.name == name)
                .peekable();
            if candidates.peek().is_some() {
                let candidates: Vec<&Binding> = candidates.collect();
                return candidates
                    .iter()
                    .rev()
                    .find(|b| b.span.lo <= pos)
                    .or_else(|| candidates.first())
                    .copied();
            }
            scope = self.scopes[id].parent;
        }
        None
    }

    /// Structural fallback: a binding anywhere in the file whose name matches
    /// exactly, or failing that after case normalization.
    ///
    /// This ignores scoping on purpose. It is only consulted when lexical
    /// lookup found nothing: template code outside the script scope, Svelte
    /// store prefixes, or naming conventions differing between dialects.
    pub fn find_by_name(&self, name: &str) -> Option<&Binding> {
        let relevant = |b: &&Binding| {
            matches!(
                b.kind,
                BindingKind::Accessor { .. } | BindingKind::Local | BindingKind::Import { .. }
            )
        };
        if let Some(exact) = self.bindings.iter().filter(relevant).find(|b| b.name == name) {
            return Some(exact);
        }
        let wanted = self.loose_name(name);
        self.bindings
            .iter()
            .filter(relevant)
            .find(|b| self.loose_name(&b.name) == wanted)
    }

    /// Name compared by the structural fallback: case-normalized, and in
    /// Svelte sources without the store `$` prefix.
    fn loose_name(&self, name: &str) -> String {
        if self.store_prefix {
            normalize_case(name.trim_start_matches('$'))
        } else {
            normalize_case(name)
        }
    }
}

struct BindingCollector {
    table: BindingTable,
    stack: Vec<ScopeId>,
    /// Scopes that receive `var` declarations.
    function_stack: Vec<ScopeId>,
}

impl BindingCollector {
    fn push_scope(&mut self, span: Span, is_function: bool) -> ScopeId {
        let id = self.table.scopes.len();
        self.table.scopes.push(Scope {
            span,
            parent: self.stack.last().copied(),
        });
        self.stack.push(id);
        if is_function {
            self.function_stack.push(id);
        }
        id
    }

    fn pop_scope(&mut self, id: ScopeId) {
        self.stack.pop();
        if self.function_stack.last() == Some(&id) {
            self.function_stack.pop();
        }
    }

    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(0)
    }

    fn current_function(&self) -> ScopeId {
        self.function_stack.last().copied().unwrap_or(0)
    }

    fn add(&mut self, name: &str, span: Span, scope: ScopeId, kind: BindingKind) {
        self.table.bindings.push(Binding {
            name: name.to_string(),
            span,
            scope,
            kind,
        });
    }

    /// Binds every name in `pat`. With an accessor call, names carry the
    /// content path their destructuring selects.
    fn bind_pat(
        &mut self,
        pat: &Pat,
        scope: ScopeId,
        call: Option<&AccessorCall>,
        path: &FieldPath,
        site: Span,
        fallback: &BindingKind,
    ) {
        match pat {
            Pat::Ident(binding) => {
                let kind = match call {
                    Some(call) => BindingKind::Accessor {
                        call: call.clone(),
                        path: path.clone(),
                        site,
                    },
                    None => fallback.clone(),
                };
                self.add(binding.id.sym.as_str(), binding.id.span, scope, kind);
            }
            Pat::Object(obj) => {
                for prop in &obj.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            let key = prop_name_str(&kv.key);
                            // A computed, non-literal key hides the path
                            let nested_call = key.as_ref().and(call);
                            let nested_path = key.map(|k| path.child(k)).unwrap_or_default();
                            self.bind_pat(
                                &kv.value,
                                scope,
                                nested_call,
                                &nested_path,
                                kv.key.span(),
                                fallback,
                            );
                        }
                        ObjectPatProp::Assign(assign) => {
                            let ident = &assign.key.id;
                            let name = ident.sym.as_str();
                            let kind = match call {
                                Some(call) => BindingKind::Accessor {
                                    call: call.clone(),
                                    path: path.child(name),
                                    site: ident.span,
                                },
                                None => fallback.clone(),
                            };
                            self.add(name, ident.span, scope, kind);
                        }
                        ObjectPatProp::Rest(rest) => {
                            self.bind_pat(&rest.arg, scope, call, path, site, fallback);
                        }
                    }
                }
            }
            Pat::Array(arr) => {
                for (i, elem) in arr.elems.iter().enumerate() {
                    if let Some(elem) = elem {
                        let nested_path = path.child(i.to_string());
                        self.bind_pat(elem, scope, call, &nested_path, elem.span(), fallback);
                    }
                }
            }
            Pat::Rest(rest) => self.bind_pat(&rest.arg, scope, call, path, site, fallback),
            Pat::Assign(assign) => self.bind_pat(&assign.left, scope, call, path, site, fallback),
            _ => {}
        }
    }

    fn bind_params<'p>(&mut self, params: impl Iterator<Item = &'p Pat>) {
        let scope = self.current();
        for pat in params {
            self.bind_pat(
                pat,
                scope,
                None,
                &FieldPath::root(),
                pat.span(),
                &BindingKind::Param,
            );
        }
    }
}

impl Visit for BindingCollector {
    fn visit_import_decl(&mut self, node: &ImportDecl) {
        let source = node.src.value.to_string_lossy().to_string();
        let scope = self.current();
        for specifier in &node.specifiers {
            let (local, imported) = match specifier {
                ImportSpecifier::Named(named) => {
                    let imported = match &named.imported {
                        Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                        Some(ModuleExportName::Str(s)) => s.value.to_string_lossy().to_string(),
                        None => named.local.sym.to_string(),
                    };
                    (&named.local, imported)
                }
                ImportSpecifier::Default(default) => (&default.local, "default".to_string()),
                ImportSpecifier::Namespace(ns) => (&ns.local, "*".to_string()),
            };
            self.add(
                local.sym.as_str(),
                local.span,
                scope,
                BindingKind::Import {
                    imported,
                    source: source.clone(),
                },
            );
        }
    }

    fn visit_var_decl(&mut self, node: &VarDecl) {
        let scope = match node.kind {
            VarDeclKind::Var => self.current_function(),
            VarDeclKind::Let | VarDeclKind::Const => self.current(),
        };
        for decl in &node.decls {
            let call = decl.init.as_deref().and_then(initializer_accessor_call);
            self.bind_pat(
                &decl.name,
                scope,
                call.as_ref(),
                &FieldPath::root(),
                decl.name.span(),
                &BindingKind::Local,
            );
            decl.visit_children_with(self);
        }
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        let scope = self.current();
        self.add(
            node.ident.sym.as_str(),
            node.ident.span,
            scope,
            BindingKind::Declaration,
        );
        node.function.visit_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        let scope = self.current();
        self.add(
            node.ident.sym.as_str(),
            node.ident.span,
            scope,
            BindingKind::Declaration,
        );
        node.class.visit_with(self);
    }

    fn visit_function(&mut self, node: &Function) {
        let id = self.push_scope(node.span, true);
        self.bind_params(node.params.iter().map(|p| &p.pat));
        node.visit_children_with(self);
        self.pop_scope(id);
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let id = self.push_scope(node.span, true);
        self.bind_params(node.params.iter());
        node.visit_children_with(self);
        self.pop_scope(id);
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        let id = self.push_scope(node.span, false);
        node.visit_children_with(self);
        self.pop_scope(id);
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        let id = self.push_scope(node.span, false);
        self.bind_params(node.param.iter());
        node.visit_children_with(self);
        self.pop_scope(id);
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) {
        let id = self.push_scope(node.span, false);
        node.visit_children_with(self);
        self.pop_scope(id);
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        let id = self.push_scope(node.span, false);
        node.visit_children_with(self);
        self.pop_scope(id);
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        let id = self.push_scope(node.span, false);
        node.visit_children_with(self);
        self.pop_scope(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::script::{ParsedSource, parse_source};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn parse(code: &str) -> (ParsedSource, BindingTable) {
        parse_file("test.tsx", code)
    }

    fn parse_file(file: &str, code: &str) -> (ParsedSource, BindingTable) {
        let parsed = parse_source(Path::new(file), code).unwrap();
        let table = BindingTable::build(&parsed);
        (parsed, table)
    }

    fn pos_of(parsed: &ParsedSource, needle: &str) -> BytePos {
        let offset = parsed.text().rfind(needle).unwrap();
        parsed.byte_pos(offset)
    }

    fn accessor_path(binding: &Binding) -> Option<String> {
        match &binding.kind {
            BindingKind::Accessor { path, .. } => Some(path.to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_plain_accessor_binding() {
        let (parsed, table) = parse(r#"const content = useIntlayer("app"); content.title;"#);
        let binding = table.lookup("content", pos_of(&parsed, "content.title")).unwrap();
        assert_eq!(accessor_path(binding).as_deref(), Some(""));
        match &binding.kind {
            BindingKind::Accessor { call, .. } => assert_eq!(call.key.as_deref(), Some("app")),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_destructured_bindings_use_source_names() {
        let (_, table) = parse(
            r#"const { title: pageTitle, hero: { subtitle }, ...rest } = useIntlayer("app");"#,
        );
        let paths: Vec<(String, Option<String>)> = table
            .bindings()
            .iter()
            .map(|b| (b.name.clone(), accessor_path(b)))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("pageTitle".to_string(), Some("title".to_string())),
                ("subtitle".to_string(), Some("hero.subtitle".to_string())),
                ("rest".to_string(), Some("".to_string())),
            ]
        );
    }

    #[test]
    fn test_inner_scope_shadows() {
        let code = r#"
const content = useIntlayer("app");
function Inner() {
  const content = other();
  return content.title;
}
content.body;
"#;
        let (parsed, table) = parse(code);
        let inner = table.lookup("content", pos_of(&parsed, "content.title")).unwrap();
        assert_eq!(inner.kind, BindingKind::Local);
        let outer = table.lookup("content", pos_of(&parsed, "content.body")).unwrap();
        assert!(outer.is_accessor());
    }

    #[test]
    fn test_params_shadow_accessor_bindings() {
        let code = r#"
const content = useIntlayer("app");
const render = (content) => content.title;
"#;
        let (parsed, table) = parse(code);
        let binding = table.lookup("content", pos_of(&parsed, "content.title")).unwrap();
        assert_eq!(binding.kind, BindingKind::Param);
    }

    #[test]
    fn test_var_hoists_to_function_scope() {
        let code = r#"
function f() {
  if (x) { var content = getIntlayer("app"); }
  return content.title;
}
"#;
        let (parsed, table) = parse(code);
        let binding = table.lookup("content", pos_of(&parsed, "content.title")).unwrap();
        assert!(binding.is_accessor());
    }

    #[test]
    fn test_import_bindings() {
        let (parsed, table) = parse(
            r#"import { useIntlayer as useContent } from "react-intlayer"; useContent("x");"#,
        );
        let binding = table.lookup("useContent", pos_of(&parsed, "useContent(")).unwrap();
        assert_eq!(
            binding.kind,
            BindingKind::Import {
                imported: "useIntlayer".to_string(),
                source: "react-intlayer".to_string()
            }
        );
    }

    #[test]
    fn test_unbound_lookup() {
        let (parsed, table) = parse("missing.title;");
        assert!(table.lookup("missing", pos_of(&parsed, "missing")).is_none());
    }

    #[test]
    fn test_find_by_name_fallbacks() {
        let (_, table) = parse(r#"const page_content = useIntlayer("app");"#);
        assert_eq!(table.find_by_name("page_content").unwrap().name, "page_content");
        assert_eq!(table.find_by_name("pageContent").unwrap().name, "page_content");
        assert!(table.find_by_name("other").is_none());
    }

    #[test]
    fn test_store_prefix_only_in_svelte() {
        let code = r#"const content = useIntlayer("app");"#;
        let (_, script) = parse(code);
        assert!(script.find_by_name("$content").is_none());

        let (_, vue) = parse_file("Page.vue", &format!("<script>{}</script>", code));
        assert!(vue.find_by_name("$content").is_none());

        let (_, svelte) = parse_file("Page.svelte", &format!("<script>{}</script>", code));
        assert_eq!(svelte.find_by_name("$content").unwrap().name, "content");
    }
}
