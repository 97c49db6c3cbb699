use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::super::args::CommonArgs;
use super::{CommandKind, CommandResult, CommandSummary};
use crate::core::Engine;

/// Engine for `--workspace`, or the current directory.
pub fn open_engine(common: &CommonArgs) -> Result<Engine> {
    let root = match &common.workspace {
        Some(root) => root.clone(),
        None => env::current_dir().context("Failed to read current directory")?,
    };
    Engine::new(root)
}

/// Absolute path and text of a file named on the command line. Relative paths
/// are taken from the current directory, like any other CLI.
pub fn read_source(file: &Path) -> Result<(PathBuf, String)> {
    let path = if file.is_absolute() {
        file.to_path_buf()
    } else {
        env::current_dir()
            .context("Failed to read current directory")?
            .join(file)
    };
    let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", file))?;
    Ok((path, text))
}

pub fn finish(kind: CommandKind, summary: CommandSummary, engine: &Engine) -> CommandResult {
    CommandResult {
        kind,
        summary,
        workspace_root: engine.workspace_root().to_path_buf(),
    }
}
