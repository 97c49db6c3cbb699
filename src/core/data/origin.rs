use serde::Serialize;

use super::FieldPath;

/// Module whose accessors return raw content instead of framework nodes.
pub const RAW_CONTENT_MODULE: &str = "intlayer";

/// A source position resolved back to the dictionary field it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOrigin {
    pub dictionary_key: String,
    /// Path from the dictionary root, including any `value`/`raw` accessor.
    pub field_path: FieldPath,
    /// Import specifier of the accessor (`intlayer`, `react-intlayer`, ...).
    pub module_source: Option<String>,
}

impl ResolutionOrigin {
    /// True when the accessor hands out plain content rather than nodes.
    pub fn returns_raw_content(&self) -> bool {
        self.module_source.as_deref() == Some(RAW_CONTENT_MODULE)
    }

    /// Field path with accessor suffixes removed, ready for content lookup.
    pub fn content_path(&self) -> FieldPath {
        self.field_path.strip_accessors()
    }
}
