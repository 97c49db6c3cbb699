//! Parsers for source files and dictionary files.
//!
//! - `json`: Unmerged dictionary JSON loading and JSON key lookup
//! - `script`: Script/TSX parsing (swc) and the per-path parse arena

pub mod json;
pub mod script;
