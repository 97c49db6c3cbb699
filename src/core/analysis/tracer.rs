//! Declaration tracing: from a root identifier back to the accessor call that
//! bound it.

use swc_common::BytePos;
use swc_ecma_ast::{ImportSpecifier, Module, ModuleDecl, ModuleItem};

use super::{
    bindings::{Binding, BindingKind, BindingTable},
    chain::resolve_chain,
};
use crate::core::{
    data::{FieldPath, ResolutionOrigin},
    parsers::script::ParsedSource,
};

/// Where a traced identifier gets its content from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationOrigin {
    pub dictionary_key: String,
    /// Path selected by destructuring; empty for a plain binding.
    pub initial_path: FieldPath,
    /// Accessor function the binding was initialized with.
    pub accessor: String,
}

/// Traces `root`, as referenced at `at`, to its accessor declaration.
///
/// A binding in scope is authoritative: when it exists but did not come from
/// an accessor call with a literal key, the result is `None`. Only when no
/// scope declares the name does the structural fallback search the whole file
/// by (case-normalized) name.
pub fn trace_declaration(bindings: &BindingTable, root: &str, at: BytePos) -> Option<DeclarationOrigin> {
    match bindings.lookup(root, at) {
        Some(binding) => origin_of(binding),
        None => bindings.find_by_name(root).and_then(origin_of),
    }
}

fn origin_of(binding: &Binding) -> Option<DeclarationOrigin> {
    match &binding.kind {
        BindingKind::Accessor { call, path, .. } => Some(DeclarationOrigin {
            dictionary_key: call.key.clone()?,
            initial_path: path.clone(),
            accessor: call.accessor.clone(),
        }),
        _ => None,
    }
}

/// Import specifier that brings `name` into the module, if any.
pub fn find_import_source(module: &Module, name: &str) -> Option<String> {
    module.body.iter().find_map(|item| {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            return None;
        };
        let imports_name = import.specifiers.iter().any(|specifier| {
            let local = match specifier {
                ImportSpecifier::Named(named) => &named.local,
                ImportSpecifier::Default(default) => &default.local,
                ImportSpecifier::Namespace(ns) => &ns.local,
            };
            local.sym.as_str() == name
        });
        imports_name.then(|| import.src.value.to_string_lossy().to_string())
    })
}

/// Resolves the expression under `offset` to the dictionary field it reads.
pub fn resolve_origin(
    parsed: &ParsedSource,
    bindings: &BindingTable,
    offset: usize,
) -> Option<ResolutionOrigin> {
    let chain = resolve_chain(parsed, offset)?;
    let declaration = trace_declaration(bindings, &chain.root, chain.root_span.lo)?;
    let module_source = find_import_source(&parsed.module, &declaration.accessor);

    Some(ResolutionOrigin {
        dictionary_key: declaration.dictionary_key,
        field_path: declaration.initial_path.join(&chain.path),
        module_source,
    })
}
