//! Intlayer project roots inside a workspace.
//!
//! A project root is a directory whose `package.json` depends on `intlayer`.
//! A workspace may hold several (monorepos); each has its own configuration
//! and dictionaries.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;

const PACKAGE_JSON: &str = "package.json";
const DEPENDENCY_SECTIONS: &[&str] = &["dependencies", "devDependencies", "peerDependencies"];
const INTLAYER_PACKAGE: &str = "intlayer";

/// Whether the `package.json` at `path` declares an `intlayer` dependency.
/// Unreadable or invalid files count as no.
fn declares_intlayer(path: &Path) -> bool {
    let Ok(content) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(json) = serde_json::from_str::<Value>(&content) else {
        tracing::debug!(path = %path.display(), "ignoring invalid package.json");
        return false;
    };
    DEPENDENCY_SECTIONS
        .iter()
        .any(|section| json.get(section).and_then(|deps| deps.get(INTLAYER_PACKAGE)).is_some())
}

/// Memoized project root lookup, bounded by the workspace root.
#[derive(Debug)]
pub struct ProjectRoots {
    workspace_root: PathBuf,
    cache: HashMap<PathBuf, PathBuf>,
}

impl ProjectRoots {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Nearest project root at or above `start_dir`, never leaving the
    /// workspace. Falls back to the workspace root.
    pub fn find(&mut self, start_dir: &Path) -> PathBuf {
        if let Some(root) = self.cache.get(start_dir) {
            return root.clone();
        }

        let mut visited = Vec::new();
        let mut current = Some(start_dir);
        let mut found = None;
        while let Some(dir) = current {
            if !dir.starts_with(&self.workspace_root) {
                break;
            }
            if let Some(root) = self.cache.get(dir) {
                found = Some(root.clone());
                break;
            }
            visited.push(dir.to_path_buf());
            if declares_intlayer(&dir.join(PACKAGE_JSON)) {
                found = Some(dir.to_path_buf());
                break;
            }
            current = dir.parent();
        }

        let root = found.unwrap_or_else(|| self.workspace_root.clone());
        for dir in visited {
            self.cache.insert(dir, root.clone());
        }
        self.cache.insert(start_dir.to_path_buf(), root.clone());
        root
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
