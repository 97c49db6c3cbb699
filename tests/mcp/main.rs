use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;

mod tools;

pub const DICTIONARY: &str = r#"[
  {
    "key": "app",
    "content": {
      "hero": { "title": "Welcome", "subtitle": "Sub" },
      "count": 3
    },
    "filePath": "src/app.content.ts",
    "location": "local"
  }
]"#;

pub const CONTENT: &str = r#"import { type Dictionary } from "intlayer";

const appContent = {
  key: "app",
  content: {
    hero: {
      title: "Welcome",
      subtitle: "Sub",
    },
    count: 3,
  },
} satisfies Dictionary;

export default appContent;
"#;

/// Test fixture for MCP integration tests
///
/// Manages a temporary Intlayer project: `package.json`, unmerged
/// dictionaries and source files.
pub struct McpTestFixture {
    _temp_dir: TempDir,
    project_root: PathBuf,
}

impl McpTestFixture {
    /// Create an empty git-rooted Intlayer project
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_root = temp_dir.path().canonicalize()?;

        fs::create_dir_all(project_root.join(".git"))?;
        fs::write(
            project_root.join("package.json"),
            r#"{ "dependencies": { "intlayer": "^7.0.0" } }"#,
        )?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_root,
        })
    }

    /// Project with the `app` dictionary and its content declaration
    pub fn with_app_dictionary() -> Result<Self> {
        let fixture = Self::new()?;
        fixture.write_file(".intlayer/unmerged_dictionary/app.json", DICTIONARY)?;
        fixture.write_file("src/app.content.ts", CONTENT)?;
        Ok(fixture)
    }

    /// Write a file relative to the project root
    pub fn write_file(&self, relative_path: &str, content: &str) -> Result<()> {
        let path = self.project_root.join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(())
    }

    /// Write a .dictscoperc.json config file
    pub fn write_config(&self, content: &Value) -> Result<()> {
        let path = self.project_root.join(".dictscoperc.json");
        let json_str = serde_json::to_string_pretty(content)?;
        fs::write(&path, format!("{}\n", json_str))?;
        Ok(())
    }

    /// Get the project root path as a string (for MCP parameters)
    pub fn root(&self) -> String {
        self.project_root.to_string_lossy().to_string()
    }

    /// Get the project root path as a Path reference
    pub fn root_path(&self) -> &Path {
        &self.project_root
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert pagination fields in a paginated result
pub fn assert_pagination(
    result: &Value,
    expected_offset: usize,
    expected_limit: usize,
    expected_has_more: bool,
) {
    let pagination = &result["pagination"];
    assert_eq!(
        pagination["offset"].as_u64().unwrap(),
        expected_offset as u64,
        "Pagination offset mismatch"
    );
    assert_eq!(
        pagination["limit"].as_u64().unwrap(),
        expected_limit as u64,
        "Pagination limit mismatch"
    );
    assert_eq!(
        pagination["hasMore"].as_bool().unwrap(),
        expected_has_more,
        "Pagination hasMore mismatch"
    );
}

/// Extract JSON value from a successful CallToolResult
///
/// Panics if the result indicates an error or cannot be parsed
pub fn extract_tool_result_json(result: &rmcp::model::CallToolResult) -> Value {
    if let Some(true) = result.is_error {
        panic!("Tool call returned an error: {:?}", result);
    }

    assert!(
        !result.content.is_empty(),
        "Tool result should have content"
    );

    let content_item = &result.content[0];
    let text_content = content_item
        .as_text()
        .expect("Tool result content should be text");

    serde_json::from_str(&text_content.text).expect("Tool result should be valid JSON")
}
