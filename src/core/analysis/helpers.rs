//! Pure helpers for reading swc AST nodes.

use swc_common::Span;
use swc_ecma_ast::{CallExpr, Callee, Expr, Lit, MemberProp, PropName};

/// Accessor functions that bind a dictionary: `useIntlayer` (hook style, in
/// components) and `getIntlayer` (direct, anywhere).
pub const ACCESSOR_NAMES: &[&str] = &["useIntlayer", "getIntlayer"];

pub fn is_accessor_name(name: &str) -> bool {
    ACCESSOR_NAMES.contains(&name)
}

/// A call to one of the [`ACCESSOR_NAMES`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorCall {
    pub accessor: String,
    /// Dictionary key, when the first argument is a plain string literal or
    /// a template literal without substitutions.
    pub key: Option<String>,
    pub span: Span,
}

/// Unwrap parentheses and TypeScript-only wrappers to get the inner expression.
pub fn unwrap_ts_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::TsAs(ts_as) => unwrap_ts_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_ts_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_ts_expr(&ts_sat.expr),
        Expr::TsNonNull(non_null) => unwrap_ts_expr(&non_null.expr),
        Expr::TsTypeAssertion(assertion) => unwrap_ts_expr(&assertion.expr),
        Expr::Paren(paren) => unwrap_ts_expr(&paren.expr),
        _ => expr,
    }
}

/// Like [`unwrap_ts_expr`], also looking through `await`.
pub fn unwrap_initializer(expr: &Expr) -> &Expr {
    match unwrap_ts_expr(expr) {
        Expr::Await(await_expr) => unwrap_initializer(&await_expr.arg),
        other => other,
    }
}

/// Static string value of a string literal or substitution-free template.
pub fn string_literal(expr: &Expr) -> Option<String> {
    match unwrap_ts_expr(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .and_then(|s| s.as_str().map(|s| s.to_string())),
        _ => None,
    }
}

/// Static key of a literal used in bracket access: strings and integers.
pub fn literal_key(expr: &Expr) -> Option<String> {
    if let Some(s) = string_literal(expr) {
        return Some(s);
    }
    match unwrap_ts_expr(expr) {
        Expr::Lit(Lit::Num(n)) if n.value.fract() == 0.0 && n.value >= 0.0 => {
            Some(format!("{}", n.value as u64))
        }
        _ => None,
    }
}

/// Static name of a property key in an object literal or pattern.
pub fn prop_name_str(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(|s| s.to_string()),
        PropName::Num(n) if n.value.fract() == 0.0 && n.value >= 0.0 => {
            Some(format!("{}", n.value as u64))
        }
        PropName::Computed(computed) => literal_key(&computed.expr),
        _ => None,
    }
}

/// Static name of a member access property (`a.b`, `a["b"]`, `a[0]`).
pub fn member_prop_name(prop: &MemberProp) -> Option<String> {
    match prop {
        MemberProp::Ident(ident) => Some(ident.sym.to_string()),
        MemberProp::Computed(computed) => literal_key(&computed.expr),
        MemberProp::PrivateName(_) => None,
    }
}

/// Name of a plain identifier callee.
pub fn callee_ident(call: &CallExpr) -> Option<&str> {
    match &call.callee {
        Callee::Expr(expr) => match unwrap_ts_expr(expr) {
            Expr::Ident(ident) => Some(ident.sym.as_str()),
            _ => None,
        },
        _ => None,
    }
}

/// Reads a call as an accessor call.
///
/// Only the first argument carries the key. Extra arguments (an explicit
/// locale) are allowed; a spread or non-literal first argument leaves the key
/// unknown.
pub fn as_accessor_call(call: &CallExpr) -> Option<AccessorCall> {
    let name = callee_ident(call)?;
    if !is_accessor_name(name) {
        return None;
    }
    let key = call
        .args
        .first()
        .filter(|arg| arg.spread.is_none())
        .and_then(|arg| string_literal(&arg.expr));
    Some(AccessorCall {
        accessor: name.to_string(),
        key,
        span: call.span,
    })
}

/// Reads a variable initializer as an accessor call, looking through
/// parentheses, TypeScript wrappers and `await`.
pub fn initializer_accessor_call(init: &Expr) -> Option<AccessorCall> {
    match unwrap_initializer(init) {
        Expr::Call(call) => as_accessor_call(call),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::script::parse_source;
    use std::path::Path;
    use swc_ecma_ast::{Decl, ModuleItem, Stmt};

    fn first_init(code: &str) -> Expr {
        let parsed = parse_source(Path::new("test.tsx"), code).unwrap();
        match &parsed.module.body[0] {
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => {
                *var.decls[0].init.clone().unwrap()
            }
            other => panic!("unexpected item: {:?}", other),
        }
    }

    #[test]
    fn test_accessor_call_with_literal_key() {
        let call = initializer_accessor_call(&first_init(r#"const c = useIntlayer("app");"#)).unwrap();
        assert_eq!(call.accessor, "useIntlayer");
        assert_eq!(call.key.as_deref(), Some("app"));

        let call = initializer_accessor_call(&first_init("const c = getIntlayer(`app`, locale);")).unwrap();
        assert_eq!(call.accessor, "getIntlayer");
        assert_eq!(call.key.as_deref(), Some("app"));
    }

    #[test]
    fn test_accessor_call_through_wrappers() {
        let init = first_init(r#"const c = (await getIntlayer("app")) as Content;"#);
        let call = initializer_accessor_call(&init).unwrap();
        assert_eq!(call.key.as_deref(), Some("app"));
    }

    #[test]
    fn test_accessor_call_with_dynamic_key() {
        let call = initializer_accessor_call(&first_init("const c = useIntlayer(key);")).unwrap();
        assert!(call.key.is_none());

        let call = initializer_accessor_call(&first_init("const c = useIntlayer(`a-${x}`);")).unwrap();
        assert!(call.key.is_none());

        let call = initializer_accessor_call(&first_init("const c = useIntlayer();")).unwrap();
        assert!(call.key.is_none());
    }

    #[test]
    fn test_non_accessor_calls() {
        assert!(initializer_accessor_call(&first_init(r#"const c = useOther("app");"#)).is_none());
        assert!(initializer_accessor_call(&first_init(r#"const c = obj.useIntlayer("app");"#)).is_none());
        assert!(initializer_accessor_call(&first_init(r#"const c = "app";"#)).is_none());
    }

    #[test]
    fn test_literal_keys() {
        assert_eq!(literal_key(&first_init(r#"const c = "a";"#)).as_deref(), Some("a"));
        assert_eq!(literal_key(&first_init("const c = 2;")).as_deref(), Some("2"));
        assert_eq!(literal_key(&first_init("const c = 1.5;")), None);
        assert_eq!(literal_key(&first_init("const c = x;")), None);
    }
}
