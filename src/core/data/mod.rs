//! Core data types shared by the analysis, cache and engine layers.
//!
//! ## Module Structure
//!
//! - `content`: Dictionary content tree (`ContentNode`)
//! - `dictionary`: Unmerged dictionary records
//! - `field_path`: Dotted paths into a content tree
//! - `origin`: Cursor resolution results
//! - `position`: Line/character positions and byte offset conversion
//! - `usage`: Per-file usage summaries of a dictionary key

pub mod content;
pub mod dictionary;
pub mod field_path;
pub mod origin;
pub mod position;
pub mod usage;

pub use content::{ContentKind, ContentNode};
pub use dictionary::{DictionaryLocation, DictionaryRecord};
pub use field_path::FieldPath;
pub use origin::ResolutionOrigin;
pub use position::{LineIndex, Position, Range};
pub use usage::{UsageLocation, UsedKey};
