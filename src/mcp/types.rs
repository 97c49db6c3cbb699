use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::{
    UnusedReport,
    data::{Position, Range, ResolutionOrigin, UsageLocation},
};

// ============================================================
// Shared Types
// ============================================================

/// Zero-based line and UTF-16 character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PositionDto {
    pub line: u32,
    pub character: u32,
}

impl From<Position> for PositionDto {
    fn from(p: Position) -> Self {
        Self {
            line: p.line,
            character: p.character,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct RangeDto {
    pub start: PositionDto,
    pub end: PositionDto,
}

impl From<Range> for RangeDto {
    fn from(r: Range) -> Self {
        Self {
            start: r.start.into(),
            end: r.end.into(),
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

// ============================================================
// Config Types (get_config)
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigParams {
    /// Absolute path of the project root
    pub project_root_path: String,
}

/// Configuration DTO for MCP
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    /// True if config was loaded from a file, false if using defaults
    pub from_file: bool,
    pub config: ConfigValues,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValues {
    pub unmerged_dictionaries_dir: String,
    pub default_locale: String,
    pub cms_url: String,
    pub ignores: Vec<String>,
}

impl From<crate::config::Config> for ConfigValues {
    fn from(c: crate::config::Config) -> Self {
        Self {
            unmerged_dictionaries_dir: c.unmerged_dictionaries_dir,
            default_locale: c.default_locale,
            cms_url: c.cms_url,
            ignores: c.ignores,
        }
    }
}

// ============================================================
// Resolve Types (resolve_origin)
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOriginParams {
    /// Absolute path of the workspace root
    pub workspace_root_path: String,
    /// Source file, absolute or relative to the workspace root
    pub file_path: String,
    /// Zero-based line
    pub line: u32,
    /// Zero-based character (UTF-16 code units)
    pub character: u32,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOriginResult {
    pub found: bool,
    pub origin: Option<OriginDto>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OriginDto {
    pub dictionary_key: String,
    /// Path from the dictionary root, including any `value`/`raw` accessor
    pub field_path: Vec<String>,
    /// Same path without accessor suffixes, as found in the dictionary
    pub content_path: Vec<String>,
    pub module_source: Option<String>,
}

impl From<ResolutionOrigin> for OriginDto {
    fn from(origin: ResolutionOrigin) -> Self {
        Self {
            content_path: origin.content_path().segments().to_vec(),
            field_path: origin.field_path.segments().to_vec(),
            dictionary_key: origin.dictionary_key,
            module_source: origin.module_source,
        }
    }
}

// ============================================================
// Usage Types (find_usages)
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindUsagesParams {
    /// Absolute path of the project root to scan
    pub project_root_path: String,
    /// Dictionary key
    pub key: String,
    /// Maximum number of files to return (default 20, max 100)
    pub limit: Option<u32>,
    /// Number of files to skip
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindUsagesResult {
    pub key: String,
    pub total_file_count: usize,
    pub items: Vec<UsageItem>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsageItem {
    pub file_path: String,
    /// Range of the first accessor call in the file
    pub declaration_range: RangeDto,
    /// Used field paths; `__ALL__` and `__EXISTENCE_CHECK__` are markers
    pub keys_used: Vec<String>,
    pub key_locations: BTreeMap<String, Vec<RangeDto>>,
}

impl From<&UsageLocation> for UsageItem {
    fn from(usage: &UsageLocation) -> Self {
        Self {
            file_path: usage.file_path.to_string_lossy().to_string(),
            declaration_range: usage.declaration_range.into(),
            keys_used: usage.rendered_keys(),
            key_locations: usage
                .key_locations
                .iter()
                .map(|(path, ranges)| (path.clone(), ranges.iter().copied().map(RangeDto::from).collect()))
                .collect(),
        }
    }
}

// ============================================================
// Locate Types (locate_field)
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocateFieldParams {
    /// Absolute path of the workspace root
    pub workspace_root_path: String,
    /// Dictionary JSON or content declaration file
    pub file_path: String,
    /// Dotted field path, e.g. `content.hero.title`
    pub field_path: String,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocateFieldResult {
    pub found: bool,
    pub position: Option<PositionDto>,
}

// ============================================================
// Unused Types (find_unused)
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindUnusedParams {
    /// Absolute path of the workspace root
    pub workspace_root_path: String,
    /// Content declaration file (`*.content.ts`, ...)
    pub file_path: String,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindUnusedResult {
    /// Dictionary key declared by the file; absent if it declares none
    pub key: Option<String>,
    /// False when no source file reads the dictionary at all
    pub dictionary_used: bool,
    pub unused_fields: Vec<UnusedFieldItem>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnusedFieldItem {
    pub path: String,
    pub range: RangeDto,
    pub is_group: bool,
}

impl From<Option<UnusedReport>> for FindUnusedResult {
    fn from(report: Option<UnusedReport>) -> Self {
        match report {
            None => Self {
                key: None,
                dictionary_used: false,
                unused_fields: Vec::new(),
            },
            Some(UnusedReport::DictionaryUnused { key, .. }) => Self {
                key: Some(key),
                dictionary_used: false,
                unused_fields: Vec::new(),
            },
            Some(UnusedReport::Fields { key, unused }) => Self {
                key: Some(key),
                dictionary_used: true,
                unused_fields: unused
                    .into_iter()
                    .map(|field| UnusedFieldItem {
                        path: field.path.to_string(),
                        range: field.range.into(),
                        is_group: field.is_group,
                    })
                    .collect(),
            },
        }
    }
}
