//! Extracted records and per-file results.

use serde::{Deserialize, Serialize};

/// One extracted value: a scalar string or a nested record produced by a
/// composite field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Composite(FileRow),
}

impl FieldValue {
    /// The scalar text, when this value is not composite.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Composite(_) => None,
        }
    }

    /// The nested record, when this value is composite.
    pub fn as_composite(&self) -> Option<&FileRow> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Composite(row) => Some(row),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

/// One extracted record: an ordered mapping from field name to value.
///
/// Field order follows the order of the field definitions in the owning
/// file definition, not the order values appear in the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRow {
    fields: Vec<(String, FieldValue)>,
}

impl FileRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; definition order is preserved by append order.
    pub fn push(&mut self, field_name: impl Into<String>, value: FieldValue) {
        self.fields.push((field_name.into(), value));
    }

    /// Look up a value by field name.
    pub fn get(&self, field_name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field_name)
            .map(|(_, value)| value)
    }

    /// Look up a scalar value by field name.
    pub fn text(&self, field_name: &str) -> Option<&str> {
        self.get(field_name).and_then(FieldValue::as_text)
    }

    pub fn contains_field(&self, field_name: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Field names in definition order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// The records extracted from one source file.
///
/// Immutable once produced; the engine holds no state between extractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInstance {
    file_name: String,
    rows: Vec<FileRow>,
}

impl FileInstance {
    pub fn new(file_name: impl Into<String>, rows: Vec<FileRow>) -> Self {
        Self {
            file_name: file_name.into(),
            rows,
        }
    }

    /// Identifier of the source file (path as opened).
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Extracted records in source order.
    pub fn rows(&self) -> &[FileRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRow> {
        self.rows.iter()
    }
}
