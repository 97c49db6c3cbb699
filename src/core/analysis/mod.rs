//! Per-file analysis of accessor calls and content declarations.
//!
//! ## Module Structure
//!
//! - `helpers`: AST reading helpers and the accessor vocabulary
//! - `bindings`: Lexical binding table (symbol lookup plus structural fallback)
//! - `chain`: Property chain under a cursor
//! - `tracer`: Binding -> accessor call -> dictionary origin
//! - `accesses`: Forward tracing of reads for one dictionary key
//! - `declaration`: `{ key, content }` declaration objects

pub mod accesses;
pub mod bindings;
pub mod chain;
pub mod declaration;
pub mod helpers;
pub mod tracer;

pub use accesses::{ReferenceSite, analyze_usages, reference_sites};
pub use bindings::BindingTable;
pub use chain::{PropertyChain, accessor_key_at, resolve_chain};
pub use declaration::{ContentDeclaration, DeclaredField, read_declaration};
pub use tracer::{DeclarationOrigin, find_import_source, resolve_origin, trace_declaration};
