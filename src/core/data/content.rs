use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::FieldPath;
use crate::utils::{collapse_whitespace, truncate_display};

/// Locale tried when the requested one has no translation.
pub const FALLBACK_LOCALE: &str = "en";

/// Maximum display width of an inline preview.
pub const PREVIEW_MAX_WIDTH: usize = 60;

/// A node of a dictionary content tree.
///
/// Dictionary JSON tags special nodes with `nodeType`; everything else is a
/// plain object, array or primitive. Unknown `nodeType` values stay
/// [`ContentNode::Object`] so their fields remain reachable by path.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    /// String, number, boolean or null.
    Primitive(Value),
    /// Per-locale values, in declaration order.
    Translation(Vec<(String, ContentNode)>),
    Markdown(Box<ContentNode>),
    Html(Box<ContentNode>),
    Insertion(Box<ContentNode>),
    Object(Vec<(String, ContentNode)>),
    Array(Vec<ContentNode>),
}

/// Coarse shape of a node, as reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Unknown,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::String => "string",
            ContentKind::Number => "number",
            ContentKind::Boolean => "boolean",
            ContentKind::Null => "null",
            ContentKind::Object => "Object",
            ContentKind::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

impl ContentNode {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => ContentNode::Array(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::from_json_object(map),
            primitive => ContentNode::Primitive(primitive.clone()),
        }
    }

    fn from_json_object(map: &Map<String, Value>) -> Self {
        let node_type = map.get("nodeType").and_then(Value::as_str);
        let wrapped = |key: &str| {
            map.get(key)
                .or_else(|| map.get("content"))
                .map(|inner| Box::new(Self::from_json(inner)))
        };

        match node_type {
            Some("translation") => {
                if let Some(Value::Object(translations)) = map.get("translation") {
                    return ContentNode::Translation(
                        translations
                            .iter()
                            .map(|(locale, v)| (locale.clone(), Self::from_json(v)))
                            .collect(),
                    );
                }
            }
            Some("markdown") => {
                if let Some(inner) = wrapped("markdown") {
                    return ContentNode::Markdown(inner);
                }
            }
            Some("html") => {
                if let Some(inner) = wrapped("html") {
                    return ContentNode::Html(inner);
                }
            }
            Some("insertion") => {
                if let Some(inner) = wrapped("insertion") {
                    return ContentNode::Insertion(inner);
                }
            }
            _ => {}
        }

        ContentNode::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), Self::from_json(v)))
                .collect(),
        )
    }

    pub fn to_json(&self) -> Value {
        fn entries(items: &[(String, ContentNode)]) -> Value {
            Value::Object(
                items
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            )
        }
        fn tagged(node_type: &str, key: &str, inner: &ContentNode) -> Value {
            let mut map = Map::new();
            map.insert("nodeType".to_string(), Value::from(node_type));
            map.insert(key.to_string(), inner.to_json());
            Value::Object(map)
        }

        match self {
            ContentNode::Primitive(v) => v.clone(),
            ContentNode::Translation(items) => {
                let mut map = Map::new();
                map.insert("nodeType".to_string(), Value::from("translation"));
                map.insert("translation".to_string(), entries(items));
                Value::Object(map)
            }
            ContentNode::Markdown(inner) => tagged("markdown", "markdown", inner),
            ContentNode::Html(inner) => tagged("html", "html", inner),
            ContentNode::Insertion(inner) => tagged("insertion", "insertion", inner),
            ContentNode::Object(items) => entries(items),
            ContentNode::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }

    /// Child reached by one path segment.
    ///
    /// Wrapper nodes are transparent. Translations are leaves: their locales
    /// are not content keys.
    pub fn child(&self, segment: &str) -> Option<&ContentNode> {
        match self {
            ContentNode::Object(items) => items.iter().find(|(k, _)| k == segment).map(|(_, v)| v),
            ContentNode::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            ContentNode::Markdown(inner) | ContentNode::Html(inner) | ContentNode::Insertion(inner) => {
                inner.child(segment)
            }
            ContentNode::Primitive(_) | ContentNode::Translation(_) => None,
        }
    }

    /// Follows `path` literally. Any missing segment is a miss.
    pub fn get(&self, path: &FieldPath) -> Option<&ContentNode> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Unwraps wrappers and picks the translation for `locale`, falling back
    /// to [`FALLBACK_LOCALE`] and then to the first declared locale.
    pub fn resolve_for_locale(&self, locale: &str) -> Option<&ContentNode> {
        match self {
            ContentNode::Markdown(inner) | ContentNode::Html(inner) | ContentNode::Insertion(inner) => {
                inner.resolve_for_locale(locale)
            }
            ContentNode::Translation(items) => {
                let pick = |wanted: &str| items.iter().find(|(l, _)| l == wanted).map(|(_, v)| v);
                pick(locale)
                    .or_else(|| pick(FALLBACK_LOCALE))
                    .or_else(|| items.first().map(|(_, v)| v))
                    .and_then(|v| v.resolve_for_locale(locale))
            }
            other => Some(other),
        }
    }

    /// Shape of the node itself, without unwrapping.
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentNode::Primitive(Value::String(_)) => ContentKind::String,
            ContentNode::Primitive(Value::Number(_)) => ContentKind::Number,
            ContentNode::Primitive(Value::Bool(_)) => ContentKind::Boolean,
            ContentNode::Primitive(Value::Null) => ContentKind::Null,
            ContentNode::Primitive(_) => ContentKind::Unknown,
            _ => ContentKind::Object,
        }
    }

    /// Shape of the first translated value, for translation nodes.
    pub fn translated_kind(&self) -> Option<ContentKind> {
        match self {
            ContentNode::Translation(items) => Some(
                items
                    .first()
                    .map(|(_, v)| v.kind())
                    .unwrap_or(ContentKind::Unknown),
            ),
            _ => None,
        }
    }

    /// Human-readable text of the node for `locale`: whitespace collapsed and
    /// truncated to [`PREVIEW_MAX_WIDTH`] columns.
    ///
    /// Structural objects have no preview. Objects shaped like rendered
    /// elements (`{ props: { children } }`) preview their text children.
    pub fn preview_text(&self, locale: &str) -> Option<String> {
        let resolved = self.resolve_for_locale(locale)?;
        let raw = match resolved {
            ContentNode::Array(items) => items
                .iter()
                .filter_map(|item| item.raw_text(locale))
                .collect::<String>(),
            ContentNode::Object(_) if resolved.is_element_like() => resolved.element_text(),
            other => other.raw_text(locale)?,
        };

        let text = collapse_whitespace(&raw);
        if text.is_empty() {
            return None;
        }
        Some(truncate_display(&text, PREVIEW_MAX_WIDTH))
    }

    fn raw_text(&self, locale: &str) -> Option<String> {
        match self.resolve_for_locale(locale)? {
            ContentNode::Primitive(Value::String(s)) => Some(s.clone()),
            ContentNode::Primitive(Value::Number(n)) => Some(n.to_string()),
            ContentNode::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.raw_text(locale))
                    .collect(),
            ),
            node @ ContentNode::Object(_) if node.is_element_like() => Some(node.element_text()),
            _ => None,
        }
    }

    fn is_element_like(&self) -> bool {
        let ContentNode::Object(items) = self else {
            return false;
        };
        let has_props = items.iter().any(|(k, _)| k == "props");
        let key_ok = items.iter().find(|(k, _)| k == "key").is_none_or(|(_, v)| {
            matches!(
                v,
                ContentNode::Primitive(Value::Null) | ContentNode::Primitive(Value::String(_))
            )
        });
        has_props && key_ok
    }

    fn element_text(&self) -> String {
        match self {
            ContentNode::Primitive(Value::String(s)) => s.clone(),
            ContentNode::Primitive(Value::Number(n)) => n.to_string(),
            ContentNode::Array(items) => items.iter().map(Self::element_text).collect(),
            ContentNode::Object(_) => self
                .child("props")
                .and_then(|props| props.child("children"))
                .map(Self::element_text)
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

impl<'de> Deserialize<'de> for ContentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(ContentNode::from_json(&value))
    }
}

impl Serialize for ContentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
