use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde_json::Value;

use crate::core::data::{DictionaryRecord, FieldPath};

/// Parses an unmerged dictionary file: a JSON array of records for one key.
///
/// A single record object is accepted as a one-element array. Records whose
/// key differs from the first record's are dropped with a warning, since one
/// file only ever describes one dictionary.
pub fn parse_dictionary_records(content: &str, file_label: &str) -> Result<Vec<DictionaryRecord>> {
    let json: Value = serde_json::from_str(content)
        .with_context(|| format!("Failed to parse dictionary JSON: {}", file_label))?;

    let items = match json {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => bail!(
            "Dictionary file {} must hold an array of records, found {}",
            file_label,
            json_type_name(&other)
        ),
    };

    let mut records: Vec<DictionaryRecord> = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let record: DictionaryRecord = serde_json::from_value(item)
            .with_context(|| format!("Invalid dictionary record #{} in {}", i, file_label))?;

        if let Some(first) = records.first()
            && first.key != record.key
        {
            tracing::warn!(
                file = file_label,
                expected = %first.key,
                found = %record.key,
                "dropping record with a foreign key"
            );
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

pub fn load_dictionary_file(path: &Path) -> Result<Vec<DictionaryRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dictionary file: {:?}", path))?;
    parse_dictionary_records(&content, &path.to_string_lossy())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Finds the byte offset of the last key of `path` in JSON-like text.
///
/// Each segment is searched for as a quoted property name (`"key":` or
/// `'key':`) starting after the previous match, so a key repeated at several
/// nesting levels resolves to the occurrence under its parent. Returns the
/// offset of the opening quote. Any segment without a match is a miss.
pub fn find_key_offset(content: &str, path: &FieldPath) -> Option<usize> {
    if path.is_root() {
        return None;
    }

    let mut cursor = 0;
    let mut found = None;
    for segment in path.segments() {
        let escaped = regex::escape(segment);
        let pattern = Regex::new(&format!(r#"(?:"{0}"|'{0}')\s*:"#, escaped)).ok()?;
        let m = pattern.find_at(content, cursor)?;
        found = Some(m.start());
        cursor = m.end();
    }
    found
}
