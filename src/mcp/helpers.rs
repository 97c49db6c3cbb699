//! Helper functions for MCP server operations.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::core::Engine;

/// Engines keyed by canonical workspace root, so caches survive across calls.
#[derive(Default)]
pub struct EnginePool {
    engines: Mutex<HashMap<PathBuf, Engine>>,
}

impl EnginePool {
    /// Run `f` against the engine of `workspace_root`, creating it on first use.
    pub fn with_engine<T>(
        &self,
        workspace_root: &str,
        f: impl FnOnce(&mut Engine) -> Result<T, McpError>,
    ) -> Result<T, McpError> {
        let root = fs::canonicalize(workspace_root).map_err(|e| {
            McpError::invalid_params(format!("Invalid workspace root '{}': {}", workspace_root, e), None)
        })?;

        let mut engines = self
            .engines
            .lock()
            .map_err(|_| McpError::internal_error("Engine pool lock poisoned", None))?;

        if !engines.contains_key(&root) {
            let engine = Engine::new(&root).map_err(|e| {
                McpError::internal_error(format!("Failed to initialize: {}", e), None)
            })?;
            engines.insert(root.clone(), engine);
        }
        let engine = engines
            .get_mut(&root)
            .ok_or_else(|| McpError::internal_error("Engine missing from pool", None))?;
        f(engine)
    }
}

/// Read a file given absolute or relative to the engine's workspace root.
pub fn read_source(engine: &Engine, file_path: &str) -> Result<(PathBuf, String), McpError> {
    let path = engine.absolute(Path::new(file_path));
    let text = fs::read_to_string(&path).map_err(|e| {
        McpError::invalid_params(format!("Failed to read '{}': {}", path.display(), e), None)
    })?;
    Ok((path, text))
}

pub fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json_str = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(json_str)]))
}
