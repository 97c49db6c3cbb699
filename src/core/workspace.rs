//! Workspace search: candidate source files for a usage scan.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::core::markup::{MARKUP_EXTENSIONS, SCRIPT_EXTENSIONS};

/// Directories never descended into.
const PRUNED_DIRS: &[&str] = &["node_modules", ".git"];

/// Enumerates and reads workspace files.
pub trait WorkspaceSearch: Send + Sync {
    /// Source files under `root` not matched by any of `ignores`, sorted.
    fn find_files(&self, root: &Path, ignores: &[String]) -> Vec<PathBuf>;

    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWorkspace;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths under the root.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext) || MARKUP_EXTENSIONS.contains(&ext))
}

fn is_pruned(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| PRUNED_DIRS.contains(&name))
}

impl WorkspaceSearch for FsWorkspace {
    fn find_files(&self, root: &Path, ignores: &[String]) -> Vec<PathBuf> {
        let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
        let mut glob_patterns: Vec<Pattern> = Vec::new();
        for p in ignores {
            if is_glob_pattern(p) {
                match Pattern::new(p) {
                    Ok(pattern) => glob_patterns.push(pattern),
                    Err(e) => tracing::warn!(pattern = %p, error = %e, "invalid ignore pattern"),
                }
            } else {
                literal_ignore_paths.push(root.join(p));
            }
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root).into_iter().filter_entry(|e| !is_pruned(e));
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "cannot access path");
                    continue;
                }
            };
            let path = entry.path();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            let path_str = path.to_string_lossy();
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if entry.file_type().is_file() && is_source_file(path) {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        files
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }
}
