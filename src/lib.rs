//! Dictscope - source analysis for Intlayer dictionaries
//!
//! Dictscope connects the code that reads Intlayer dictionaries
//! (`useIntlayer("key")`, `getIntlayer("key")`) with the dictionaries and
//! content declaration files that define them. It resolves positions to
//! dictionary fields, finds usages and definitions, reports unused content
//! fields and produces inline previews.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Analysis engine (parsing, usage tracing, caches)
//! - `logging`: Tracing subscriber setup
//! - `mcp`: Model Context Protocol server implementation
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod mcp;
pub mod utils;
