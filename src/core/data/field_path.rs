use std::fmt;

use serde::{Serialize, Serializer};

/// Accessor suffixes exposed by framework content nodes. They read the node
/// itself rather than a child, so they never name a content key.
pub const ACCESSOR_SUFFIXES: &[&str] = &["value", "raw"];

/// Ordered path of segments inside a content tree, e.g. `["hero", "title"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parses a dotted path. Empty input yields the root path.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self(dotted.split('.').map(String::from).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    pub fn join(&self, other: &FieldPath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    pub fn prepend(&self, segment: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.push(segment.into());
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Every proper, non-empty prefix, shortest first.
    pub fn proper_prefixes(&self) -> impl Iterator<Item = FieldPath> + '_ {
        (1..self.0.len()).map(|n| FieldPath(self.0[..n].to_vec()))
    }

    /// Drops `value`/`raw` segments that follow the first segment.
    ///
    /// The first segment is kept even when it is `value` or `raw`, since at
    /// the root it can only be a content key.
    pub fn strip_accessors(&self) -> Self {
        let mut segments = Vec::with_capacity(self.0.len());
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 && ACCESSOR_SUFFIXES.contains(&segment.as_str()) {
                continue;
            }
            segments.push(segment.clone());
        }
        Self(segments)
    }

    /// True when the original path ended on a `value`/`raw` accessor.
    pub fn ends_with_accessor(&self) -> bool {
        self.0.len() > 1
            && self
                .0
                .last()
                .is_some_and(|s| ACCESSOR_SUFFIXES.contains(&s.as_str()))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<Vec<String>> for FieldPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for FieldPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
