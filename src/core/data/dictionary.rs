use serde::{Deserialize, Serialize};

use super::ContentNode;

/// Where a dictionary record lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DictionaryLocation {
    #[default]
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "remote")]
    Remote,
    #[serde(rename = "local&remote")]
    LocalAndRemote,
}

impl DictionaryLocation {
    /// Remote-only records have no content on disk worth showing.
    pub fn is_remote_only(self) -> bool {
        matches!(self, DictionaryLocation::Remote)
    }
}

/// One declaration of a dictionary, as stored in the unmerged dictionary JSON.
///
/// A key may be declared by several records (several content files, or a
/// local file mirrored remotely).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryRecord {
    pub key: String,
    #[serde(default = "empty_content")]
    pub content: ContentNode,
    /// Content declaration file, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default)]
    pub location: DictionaryLocation,
}

fn empty_content() -> ContentNode {
    ContentNode::Object(Vec::new())
}
