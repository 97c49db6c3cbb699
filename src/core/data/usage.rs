use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    path::PathBuf,
};

use serde::{Serialize, Serializer};

use super::{FieldPath, Range};

/// Rendered marker for "every field under this prefix is used".
pub const ALL_FIELDS_MARKER: &str = "__ALL__";

/// Rendered marker for an accessor call whose result is not bound.
pub const EXISTENCE_CHECK_MARKER: &str = "__EXISTENCE_CHECK__";

/// One entry of a usage's key set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UsedKey {
    /// A statically known field path.
    Field(FieldPath),
    /// The field path below this prefix could not be determined, so every
    /// field under it counts as used. The root prefix covers the whole
    /// dictionary.
    AllFields(FieldPath),
    /// The accessor was called but its result never bound to a name.
    ExistenceCheck,
}

impl UsedKey {
    /// Whether this entry marks `path` as used.
    pub fn covers(&self, path: &FieldPath) -> bool {
        match self {
            UsedKey::Field(field) => field == path,
            UsedKey::AllFields(prefix) => path.starts_with(prefix),
            UsedKey::ExistenceCheck => false,
        }
    }
}

impl fmt::Display for UsedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsedKey::Field(path) => write!(f, "{}", path),
            UsedKey::AllFields(prefix) if prefix.is_root() => write!(f, "{}", ALL_FIELDS_MARKER),
            UsedKey::AllFields(prefix) => write!(f, "{}.{}", prefix, ALL_FIELDS_MARKER),
            UsedKey::ExistenceCheck => write!(f, "{}", EXISTENCE_CHECK_MARKER),
        }
    }
}

impl Serialize for UsedKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Every reference to one dictionary key inside one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLocation {
    pub file_path: PathBuf,
    /// Range of the first accessor call in the file.
    pub declaration_range: Range,
    pub keys_used: BTreeSet<UsedKey>,
    /// Precise ranges per dotted field path.
    pub key_locations: BTreeMap<String, Vec<Range>>,
}

impl UsageLocation {
    pub fn uses_field(&self, path: &FieldPath) -> bool {
        self.keys_used.iter().any(|key| key.covers(path))
    }

    /// Whether `path` is only known to be used through an all-fields marker.
    pub fn covers_all(&self, path: &FieldPath) -> bool {
        self.keys_used
            .iter()
            .any(|key| matches!(key, UsedKey::AllFields(_)) && key.covers(path))
    }

    pub fn ranges_for(&self, path: &FieldPath) -> &[Range] {
        self.key_locations
            .get(&path.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Key set rendered as strings, in stable order.
    pub fn rendered_keys(&self) -> Vec<String> {
        self.keys_used.iter().map(ToString::to_string).collect()
    }
}
