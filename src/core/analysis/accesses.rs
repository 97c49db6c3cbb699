//! Forward tracing of dictionary accesses inside one file.
//!
//! Starting from every accessor call for a key, follows the bound names to
//! each place they are read and records which content fields those reads
//! reach. Reads whose field cannot be decided statically mark a whole subtree
//! as used instead.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    CallExpr, Callee, Expr, Ident, JSXClosingElement, JSXElementName, JSXMemberExpr, JSXObject,
    MemberExpr, MemberProp, ObjectPatProp, OptChainBase, Pat, Prop, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::{
    bindings::BindingTable,
    helpers::{as_accessor_call, initializer_accessor_call, literal_key, prop_name_str},
    tracer::{find_import_source, trace_declaration},
};
use crate::core::{
    data::{FieldPath, Range, ResolutionOrigin, UsageLocation, UsedKey},
    parsers::script::ParsedSource,
};

/// One step outward from the base of an access chain.
#[derive(Debug, Clone)]
enum Step {
    /// Static property name and the span of the name (or literal key).
    Prop { name: String, span: Span },
    /// Bracket access with a non-literal key.
    Dynamic,
    Call,
}

#[derive(Debug, Clone, Copy)]
enum Base<'a> {
    Ident(&'a Ident),
    Accessor(&'a CallExpr),
    Other(&'a Expr),
}

/// An access chain read from the inside out: `content.hero[i].title()` is
/// base `content` with steps `hero`, dynamic, `title`, call.
struct Spine<'a> {
    base: Base<'a>,
    steps: Vec<Step>,
    /// Expressions hanging off the chain (computed keys, call arguments).
    side: Vec<&'a Expr>,
}

fn linearize(expr: &Expr) -> Spine<'_> {
    let mut steps = Vec::new();
    let mut side = Vec::new();
    let base = descend(expr, &mut steps, &mut side);
    steps.reverse();
    Spine { base, steps, side }
}

/// Walks from the outermost access towards the base, pushing steps outer
/// first.
fn descend<'a>(expr: &'a Expr, steps: &mut Vec<Step>, side: &mut Vec<&'a Expr>) -> Base<'a> {
    match expr {
        Expr::Ident(ident) => Base::Ident(ident),
        Expr::Member(member) => descend_member(member, steps, side),
        Expr::OptChain(chain) => match &*chain.base {
            OptChainBase::Member(member) => descend_member(member, steps, side),
            OptChainBase::Call(call) => {
                steps.push(Step::Call);
                side.extend(call.args.iter().map(|arg| &*arg.expr));
                descend(&call.callee, steps, side)
            }
        },
        Expr::Call(call) => {
            if as_accessor_call(call).is_some() {
                return Base::Accessor(call);
            }
            let Callee::Expr(callee) = &call.callee else {
                return Base::Other(expr);
            };
            steps.push(Step::Call);
            side.extend(call.args.iter().map(|arg| &*arg.expr));
            descend(callee, steps, side)
        }
        Expr::Paren(paren) => descend(&paren.expr, steps, side),
        Expr::TsAs(ts_as) => descend(&ts_as.expr, steps, side),
        Expr::TsNonNull(non_null) => descend(&non_null.expr, steps, side),
        Expr::TsSatisfies(sat) => descend(&sat.expr, steps, side),
        Expr::TsConstAssertion(ts_const) => descend(&ts_const.expr, steps, side),
        Expr::TsTypeAssertion(assertion) => descend(&assertion.expr, steps, side),
        _ => Base::Other(expr),
    }
}

fn descend_member<'a>(
    member: &'a MemberExpr,
    steps: &mut Vec<Step>,
    side: &mut Vec<&'a Expr>,
) -> Base<'a> {
    match &member.prop {
        MemberProp::Ident(ident) => steps.push(Step::Prop {
            name: ident.sym.to_string(),
            span: ident.span,
        }),
        MemberProp::Computed(computed) => match literal_key(&computed.expr) {
            Some(name) => steps.push(Step::Prop {
                name,
                span: computed.expr.span(),
            }),
            None => {
                steps.push(Step::Dynamic);
                side.push(&computed.expr);
            }
        },
        MemberProp::PrivateName(_) => steps.push(Step::Dynamic),
    }
    descend(&member.obj, steps, side)
}

/// JSX tag members (`<content.hero.Title />`) as a spine of static steps.
fn linearize_jsx(member: &JSXMemberExpr) -> (&Ident, Vec<Step>) {
    let mut steps = vec![Step::Prop {
        name: member.prop.sym.to_string(),
        span: member.prop.span,
    }];
    let mut obj = &member.obj;
    loop {
        match obj {
            JSXObject::Ident(ident) => {
                steps.reverse();
                return (ident, steps);
            }
            JSXObject::JSXMemberExpr(inner) => {
                steps.push(Step::Prop {
                    name: inner.prop.sym.to_string(),
                    span: inner.prop.span,
                });
                obj = &inner.obj;
            }
        }
    }
}

/// A name bound by a destructuring pattern.
enum PatternEntry {
    /// Local name with its path relative to the pattern root and the span of
    /// the property that selected it (none for the root or a rest element).
    Name {
        local: Span,
        path: FieldPath,
        site: Option<Span>,
    },
    /// Nested pattern selected by a property: `hero` in `{ hero: { title } }`.
    Group { path: FieldPath, site: Span },
    /// Computed, non-literal key: everything below `path` may be read.
    Dynamic(FieldPath),
}

fn pattern_entries(pat: &Pat, path: FieldPath, site: Option<Span>, out: &mut Vec<PatternEntry>) {
    match pat {
        Pat::Ident(binding) => out.push(PatternEntry::Name {
            local: binding.id.span,
            path,
            site,
        }),
        Pat::Object(obj) => {
            if let Some(site) = site {
                out.push(PatternEntry::Group {
                    path: path.clone(),
                    site,
                });
            }
            for prop in &obj.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => match prop_name_str(&kv.key) {
                        Some(key) => {
                            pattern_entries(&kv.value, path.child(key), Some(kv.key.span()), out)
                        }
                        None => out.push(PatternEntry::Dynamic(path.clone())),
                    },
                    ObjectPatProp::Assign(assign) => {
                        let ident = &assign.key.id;
                        out.push(PatternEntry::Name {
                            local: ident.span,
                            path: path.child(ident.sym.as_str()),
                            site: Some(ident.span),
                        });
                    }
                    ObjectPatProp::Rest(rest) => pattern_entries(&rest.arg, path.clone(), None, out),
                }
            }
        }
        Pat::Array(arr) => {
            if let Some(site) = site {
                out.push(PatternEntry::Group {
                    path: path.clone(),
                    site,
                });
            }
            for (i, elem) in arr.elems.iter().enumerate() {
                if let Some(elem) = elem {
                    pattern_entries(elem, path.child(i.to_string()), Some(elem.span()), out);
                }
            }
        }
        Pat::Rest(rest) => pattern_entries(&rest.arg, path, None, out),
        Pat::Assign(assign) => pattern_entries(&assign.left, path, site, out),
        _ => {}
    }
}

/// Analyses every use of dictionary `key` in `parsed`.
///
/// Returns `None` when the file never calls an accessor with that key.
pub fn analyze_usages(parsed: &ParsedSource, bindings: &BindingTable, key: &str) -> Option<UsageLocation> {
    let mut tracer = UsageTracer {
        parsed,
        bindings,
        key,
        tracked: HashMap::new(),
        first_call: None,
        keys_used: BTreeSet::new(),
        key_locations: BTreeMap::new(),
    };
    parsed.module.visit_with(&mut tracer);

    let first_call = tracer.first_call?;
    Some(UsageLocation {
        file_path: parsed.path.clone(),
        declaration_range: parsed.range(first_call),
        keys_used: tracer.keys_used,
        key_locations: tracer.key_locations,
    })
}

struct UsageTracer<'a> {
    parsed: &'a ParsedSource,
    bindings: &'a BindingTable,
    key: &'a str,
    /// Declaring identifier span of each traced name, with its content path.
    tracked: HashMap<Span, FieldPath>,
    first_call: Option<Span>,
    keys_used: BTreeSet<UsedKey>,
    key_locations: BTreeMap<String, Vec<Range>>,
}

impl UsageTracer<'_> {
    fn matches_key(&self, call: &CallExpr) -> bool {
        as_accessor_call(call).is_some_and(|c| c.key.as_deref() == Some(self.key))
    }

    fn note_call(&mut self, span: Span) {
        if self.first_call.is_none_or(|first| span.lo < first.lo) {
            self.first_call = Some(span);
        }
    }

    /// Content path of the traced name `ident` refers to.
    ///
    /// Lexical lookup decides when it finds a declaration; a name no scope
    /// declares (template code, store prefixes) falls back to a name match.
    fn tracked_path(&self, ident: &Ident) -> Option<FieldPath> {
        let name = ident.sym.as_str();
        let binding = self
            .bindings
            .lookup(name, ident.span.lo)
            .or_else(|| self.bindings.find_by_name(name))?;
        self.tracked.get(&binding.span).cloned()
    }

    fn record_field(&mut self, path: &FieldPath, span: Option<Span>) {
        let stripped = path.strip_accessors();
        if stripped.is_root() {
            return;
        }
        if let Some(span) = span
            && stripped.len() == path.len()
        {
            let range = self.parsed.range(span);
            self.key_locations
                .entry(stripped.to_string())
                .or_default()
                .push(range);
        }
        self.close_prefixes(&stripped);
        self.keys_used.insert(UsedKey::Field(stripped));
    }

    fn record_all(&mut self, path: &FieldPath) {
        let stripped = path.strip_accessors();
        if !stripped.is_root() {
            self.close_prefixes(&stripped);
            self.keys_used.insert(UsedKey::Field(stripped.clone()));
        }
        self.keys_used.insert(UsedKey::AllFields(stripped));
    }

    fn close_prefixes(&mut self, path: &FieldPath) {
        for prefix in path.proper_prefixes() {
            self.keys_used.insert(UsedKey::Field(prefix));
        }
    }

    /// Records the fields read by `steps` applied to a value at `base`.
    fn record_steps(&mut self, base: &FieldPath, steps: &[Step]) {
        let mut path = base.clone();
        for (i, step) in steps.iter().enumerate() {
            match step {
                Step::Prop { name, span } => {
                    path.push(name.clone());
                    self.record_field(&path, Some(*span));
                }
                Step::Dynamic => {
                    self.record_all(&path);
                    return;
                }
                Step::Call => {
                    // Calling the value itself hands all of it over
                    if i == 0 {
                        self.record_all(&path);
                    }
                    return;
                }
            }
        }
    }

    /// Starts tracing every name bound by `pat` from a value at `base`.
    fn track_pattern(&mut self, pat: &Pat, base: &FieldPath) {
        let mut entries = Vec::new();
        pattern_entries(pat, FieldPath::root(), None, &mut entries);
        for entry in entries {
            match entry {
                PatternEntry::Name { local, path, site } => {
                    let full = base.join(&path);
                    if site.is_some() {
                        self.record_field(&full, site);
                    }
                    self.tracked.insert(local, full);
                }
                PatternEntry::Group { path, site } => self.record_field(&base.join(&path), Some(site)),
                PatternEntry::Dynamic(path) => self.record_all(&base.join(&path)),
            }
        }
    }

    /// Path of a declarator initializer that reads a traced value through
    /// static properties only, recording those reads.
    fn tracked_initializer(&mut self, init: &Expr) -> Option<FieldPath> {
        let spine = linearize(init);
        let Base::Ident(ident) = spine.base else {
            return None;
        };
        let base = self.tracked_path(ident)?;
        if !spine.steps.iter().all(|step| matches!(step, Step::Prop { .. })) {
            return None;
        }
        self.record_steps(&base, &spine.steps);
        let mut path = base;
        for step in spine.steps {
            if let Step::Prop { name, .. } = step {
                path.push(name);
            }
        }
        Some(path)
    }

    fn bare_reference(&mut self, ident: &Ident) {
        if let Some(path) = self.tracked_path(ident) {
            self.record_all(&path);
        }
    }
}

impl Visit for UsageTracer<'_> {
    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let Some(init) = node.init.as_deref() {
            if let Some(call) = initializer_accessor_call(init)
                && call.key.as_deref() == Some(self.key)
            {
                self.note_call(call.span);
                self.track_pattern(&node.name, &FieldPath::root());
                node.name.visit_with(self);
                return;
            }
            if let Some(base) = self.tracked_initializer(init) {
                self.track_pattern(&node.name, &base);
                node.name.visit_with(self);
                return;
            }
        }
        node.visit_children_with(self);
    }

    fn visit_expr(&mut self, node: &Expr) {
        match node {
            Expr::Ident(ident) => self.bare_reference(ident),
            Expr::Member(_) | Expr::OptChain(_) | Expr::Call(_) => {
                let spine = linearize(node);
                if spine.steps.is_empty() {
                    node.visit_children_with(self);
                    return;
                }
                match spine.base {
                    Base::Ident(ident) => {
                        if let Some(path) = self.tracked_path(ident) {
                            self.record_steps(&path, &spine.steps);
                        }
                    }
                    Base::Accessor(call) => {
                        if self.matches_key(call) {
                            self.note_call(call.span);
                            self.record_steps(&FieldPath::root(), &spine.steps);
                        }
                    }
                    Base::Other(expr) => expr.visit_with(self),
                }
                for expr in spine.side {
                    expr.visit_with(self);
                }
            }
            _ => node.visit_children_with(self),
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.matches_key(node) {
            self.note_call(node.span);
            self.keys_used.insert(UsedKey::ExistenceCheck);
        }
        node.visit_children_with(self);
    }

    fn visit_prop(&mut self, node: &Prop) {
        match node {
            Prop::Shorthand(ident) => self.bare_reference(ident),
            _ => node.visit_children_with(self),
        }
    }

    fn visit_jsx_element_name(&mut self, node: &JSXElementName) {
        match node {
            // Tag names only count when a scope declares them; a loose name
            // match would turn `<Title />` into a read of `title`.
            JSXElementName::Ident(ident) => {
                let path = self
                    .bindings
                    .lookup(ident.sym.as_str(), ident.span.lo)
                    .and_then(|binding| self.tracked.get(&binding.span).cloned());
                if let Some(path) = path {
                    self.record_all(&path);
                }
            }
            JSXElementName::JSXMemberExpr(member) => {
                let (root, steps) = linearize_jsx(member);
                if let Some(path) = self.tracked_path(root) {
                    self.record_steps(&path, &steps);
                }
            }
            JSXElementName::JSXNamespacedName(_) => {}
        }
    }

    // The opening tag already accounts for the element.
    fn visit_jsx_closing_element(&mut self, _node: &JSXClosingElement) {}
}

/// A read of dictionary content somewhere in a file.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSite {
    pub origin: ResolutionOrigin,
    /// Byte offset just past the read expression.
    pub end: usize,
}

/// Every read of accessor-bound content in `parsed`, whatever its key, in
/// source order.
///
/// Each site carries the longest static path of the read: `content.a.b()`
/// reads `a.b`, `content.a[i]` reads `a`.
pub fn reference_sites(parsed: &ParsedSource, bindings: &BindingTable) -> Vec<ReferenceSite> {
    let mut collector = ReferenceCollector {
        parsed,
        bindings,
        sites: Vec::new(),
    };
    parsed.module.visit_with(&mut collector);
    collector.sites.sort_by_key(|site| site.end);
    collector.sites
}

struct ReferenceCollector<'a> {
    parsed: &'a ParsedSource,
    bindings: &'a BindingTable,
    sites: Vec<ReferenceSite>,
}

impl ReferenceCollector<'_> {
    fn push(&mut self, root: &Ident, steps: &[Step], end: Span) {
        let Some(declaration) = trace_declaration(self.bindings, root.sym.as_str(), root.span.lo)
        else {
            return;
        };
        let mut path = declaration.initial_path;
        for step in steps {
            match step {
                Step::Prop { name, .. } => path.push(name.clone()),
                Step::Dynamic | Step::Call => break,
            }
        }
        let module_source = find_import_source(&self.parsed.module, &declaration.accessor);
        self.sites.push(ReferenceSite {
            origin: ResolutionOrigin {
                dictionary_key: declaration.dictionary_key,
                field_path: path,
                module_source,
            },
            end: self.parsed.offset(end.hi),
        });
    }
}

impl Visit for ReferenceCollector<'_> {
    fn visit_expr(&mut self, node: &Expr) {
        match node {
            Expr::Ident(ident) => self.push(ident, &[], ident.span),
            Expr::Member(_) | Expr::OptChain(_) | Expr::Call(_) => {
                let spine = linearize(node);
                if spine.steps.is_empty() {
                    node.visit_children_with(self);
                    return;
                }
                match spine.base {
                    Base::Ident(ident) => self.push(ident, &spine.steps, node.span()),
                    Base::Accessor(_) => {}
                    Base::Other(expr) => expr.visit_with(self),
                }
                for expr in spine.side {
                    expr.visit_with(self);
                }
            }
            _ => node.visit_children_with(self),
        }
    }

    fn visit_jsx_element_name(&mut self, node: &JSXElementName) {
        if let JSXElementName::JSXMemberExpr(member) = node {
            let (root, steps) = linearize_jsx(member);
            self.push(root, &steps, member.prop.span);
        }
    }

    fn visit_jsx_closing_element(&mut self, _node: &JSXClosingElement) {}
}
