//! Property-chain resolution under a cursor.
//!
//! Given a byte offset, finds the expression under it and recovers the root
//! identifier plus the property path from that root up to (and including)
//! the property at the cursor: hovering `title` in `content.hero.title.value`
//! yields root `content` and path `hero.title`.

use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    CallExpr, Callee, Expr, JSXMemberExpr, JSXObject, MemberExpr, OptChainBase, Str,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::helpers::{AccessorCall, as_accessor_call, member_prop_name, unwrap_ts_expr};
use crate::core::{data::FieldPath, parsers::script::ParsedSource};

/// Root identifier and access path of the expression under a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChain {
    pub root: String,
    pub root_span: Span,
    pub path: FieldPath,
}

/// Resolves the chain under the byte `offset` of `parsed`.
///
/// Returns `None` when the cursor is not on an identifier or property name,
/// when it sits on a string literal, or when a non-literal computed property
/// sits between the root and the cursor.
pub fn resolve_chain(parsed: &ParsedSource, offset: usize) -> Option<PropertyChain> {
    let mut finder = CursorFinder {
        pos: parsed.byte_pos(offset),
        best: None,
        on_string: false,
    };
    parsed.module.visit_with(&mut finder);

    if finder.on_string {
        return None;
    }
    finder.best.and_then(|(_, chain)| chain)
}

/// Accessor call whose literal key argument is under the byte `offset`, as
/// the `"app"` in `useIntlayer("app")`.
pub fn accessor_key_at(parsed: &ParsedSource, offset: usize) -> Option<AccessorCall> {
    let mut finder = KeyLiteralFinder {
        pos: parsed.byte_pos(offset),
        found: None,
    };
    parsed.module.visit_with(&mut finder);
    finder.found
}

/// Flattens an expression into its root identifier, pushing property names
/// onto `segments` leaf first.
fn flatten_expr(expr: &Expr, segments: &mut Vec<String>) -> Option<(String, Span)> {
    match unwrap_ts_expr(expr) {
        Expr::Ident(ident) => Some((ident.sym.to_string(), ident.span)),
        Expr::Member(member) => flatten_member(member, segments),
        Expr::OptChain(chain) => match &*chain.base {
            OptChainBase::Member(member) => flatten_member(member, segments),
            OptChainBase::Call(call) => flatten_expr(&call.callee, segments),
        },
        Expr::Call(call) => match &call.callee {
            Callee::Expr(callee) => flatten_expr(callee, segments),
            _ => None,
        },
        _ => None,
    }
}

fn flatten_member(member: &MemberExpr, segments: &mut Vec<String>) -> Option<(String, Span)> {
    segments.push(member_prop_name(&member.prop)?);
    flatten_expr(&member.obj, segments)
}

fn flatten_jsx_member(member: &JSXMemberExpr, segments: &mut Vec<String>) -> Option<(String, Span)> {
    segments.push(member.prop.sym.to_string());
    match &member.obj {
        JSXObject::Ident(ident) => Some((ident.sym.to_string(), ident.span)),
        JSXObject::JSXMemberExpr(inner) => flatten_jsx_member(inner, segments),
    }
}

fn into_chain(root: Option<(String, Span)>, mut segments: Vec<String>) -> Option<PropertyChain> {
    let (root, root_span) = root?;
    segments.reverse();
    Some(PropertyChain {
        root,
        root_span,
        path: FieldPath::new(segments),
    })
}

struct CursorFinder {
    pos: BytePos,
    /// Narrowest hit so far: span width and the chain it resolves to.
    best: Option<(u32, Option<PropertyChain>)>,
    on_string: bool,
}

impl CursorFinder {
    fn hits(&self, span: Span) -> bool {
        span.lo <= self.pos && self.pos <= span.hi
    }

    fn record(&mut self, span: Span, chain: impl FnOnce() -> Option<PropertyChain>) {
        if !self.hits(span) {
            return;
        }
        let width = span.hi.0 - span.lo.0;
        if self.best.as_ref().is_none_or(|(w, _)| width < *w) {
            self.best = Some((width, chain()));
        }
    }
}

impl Visit for CursorFinder {
    fn visit_expr(&mut self, node: &Expr) {
        if let Expr::Ident(ident) = node {
            self.record(ident.span, || {
                Some(PropertyChain {
                    root: ident.sym.to_string(),
                    root_span: ident.span,
                    path: FieldPath::root(),
                })
            });
        }
        node.visit_children_with(self);
    }

    fn visit_member_expr(&mut self, node: &MemberExpr) {
        let prop_span = node.prop.span();
        self.record(prop_span, || {
            let mut segments = Vec::new();
            into_chain(flatten_member(node, &mut segments), segments)
        });
        node.visit_children_with(self);
    }

    fn visit_jsx_member_expr(&mut self, node: &JSXMemberExpr) {
        self.record(node.prop.span, || {
            let mut segments = Vec::new();
            into_chain(flatten_jsx_member(node, &mut segments), segments)
        });
        if let JSXObject::Ident(ident) = &node.obj {
            self.record(ident.span, || {
                Some(PropertyChain {
                    root: ident.sym.to_string(),
                    root_span: ident.span,
                    path: FieldPath::root(),
                })
            });
        }
        node.visit_children_with(self);
    }

    fn visit_str(&mut self, node: &Str) {
        if self.hits(node.span) {
            self.on_string = true;
        }
    }
}

struct KeyLiteralFinder {
    pos: BytePos,
    found: Option<AccessorCall>,
}

impl Visit for KeyLiteralFinder {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.found.is_some() {
            return;
        }
        if let Some(arg) = node.args.first()
            && arg.expr.span().lo <= self.pos
            && self.pos <= arg.expr.span().hi
            && let Some(call) = as_accessor_call(node).filter(|call| call.key.is_some())
        {
            self.found = Some(call);
            return;
        }
        node.visit_children_with(self);
    }
}
