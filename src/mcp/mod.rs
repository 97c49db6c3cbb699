//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the dictionary analysis engine to AI assistants over stdio.
//!
//! ## Module Structure
//!
//! - `helpers`: Engine pooling and result encoding shared by the tools
//! - `server`: Main MCP server implementation
//! - `types`: Tool parameter and result types

mod helpers;
mod server;
pub mod types;

pub use server::{DictscopeMcpServer, run_server};
