//! Core analysis engine.
//!
//! ## Module Structure
//!
//! - `analysis`: Per-file analysis (bindings, property chains, usage tracing)
//! - `cache`: Config, dictionary and usage caches with an injectable clock
//! - `data`: Shared data types (content tree, field paths, positions, usages)
//! - `debounce`: Trailing-edge debouncing for watch passes
//! - `engine`: The `Engine` owning caches and collaborators, one method per request
//! - `locate`: Field location lookup inside dictionary sources
//! - `markup`: Script blocks and template expressions embedded in Vue/Svelte files
//! - `parsers`: swc parsing and dictionary JSON loading
//! - `project`: Intlayer project root discovery
//! - `usage_scanner`: Workspace-wide usage scan for one key
//! - `workspace`: Candidate file enumeration

pub mod analysis;
pub mod cache;
pub mod data;
pub mod debounce;
pub mod engine;
pub mod locate;
pub mod markup;
pub mod parsers;
pub mod project;
pub mod usage_scanner;
pub mod workspace;

pub use engine::{
    DefinitionTarget, Engine, HoverBody, HoverEntry, HoverInfo, InlinePreview, SourceLocation,
    UnusedField, UnusedReport,
};
