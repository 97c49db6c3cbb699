//! Workspace-wide usage scan for one dictionary key.

use std::path::Path;

use anyhow::{Result, bail};
use rayon::prelude::*;

use crate::core::{
    analysis::{BindingTable, analyze_usages},
    data::UsageLocation,
    parsers::script::parse_source,
    workspace::WorkspaceSearch,
};

/// Finds every file under `project_root` that reads dictionary `key`.
///
/// Files are filtered by a plain substring check before parsing. Files are
/// read and parsed in parallel, each with its own parser state; a file that
/// cannot be read or parsed is logged and skipped. Results are sorted by path,
/// one entry per file.
pub fn find_usages(
    workspace: &dyn WorkspaceSearch,
    project_root: &Path,
    key: &str,
    ignores: &[String],
) -> Result<Vec<UsageLocation>> {
    if !project_root.is_dir() {
        bail!("Project root does not exist: {}", project_root.display());
    }

    let files = workspace.find_files(project_root, ignores);
    let total = files.len();

    let mut usages: Vec<UsageLocation> = files
        .par_iter()
        .filter_map(|path| {
            let source = match workspace.read_to_string(path) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    return None;
                }
            };
            if !source.contains(key) {
                return None;
            }

            let parsed = match parse_source(path, &source) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unparsable file");
                    return None;
                }
            };
            let bindings = BindingTable::build(&parsed);
            analyze_usages(&parsed, &bindings, key)
        })
        .collect();

    usages.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    tracing::debug!(
        key,
        root = %project_root.display(),
        scanned = total,
        matched = usages.len(),
        "usage scan finished"
    );
    Ok(usages)
}
