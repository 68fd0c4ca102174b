//! File and field definitions.
//!
//! A [`FileDefinition`] declares how a file is laid out; each
//! [`FieldDefinition`] declares how one named value is located within a
//! record. Definitions are validated when constructed and never mutated
//! afterwards, so a single definition can be reused across many files.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::{DefinitionError, Result};

/// Supported file formats.
///
/// This is a closed set: adding a format means adding a variant here and an
/// extraction strategy for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileType {
    /// Fields separated by a delimiter string.
    Delimited,
    /// Fields at fixed character positions within a line.
    Fixed,
    /// Records as child elements of an XML document.
    Xml,
}

impl FileType {
    /// Returns the canonical spelling used in definition files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Delimited => "DELIMITED",
            FileType::Fixed => "FIXED",
            FileType::Xml => "XML",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileType {
    type Err = DefinitionError;

    /// Parse a file type string (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim();
        if normalized.is_empty() {
            return Err(DefinitionError::MissingFileType);
        }
        match normalized.to_uppercase().as_str() {
            "DELIMITED" => Ok(FileType::Delimited),
            "FIXED" => Ok(FileType::Fixed),
            "XML" => Ok(FileType::Xml),
            _ => Err(DefinitionError::UnsupportedFileType {
                value: s.to_string(),
            }),
        }
    }
}

/// How one field's value is located within a record.
///
/// Scalar-vs-composite is a type-level distinction: composite variants carry
/// their child definitions, so a scalar rule can never be asked for children
/// and a fixed-width rule can never nest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldRule {
    /// Zero-based index into the line after splitting on the file delimiter.
    Delimited { position_in_row: usize },

    /// The raw piece at `position_in_row` is split again on `delimiter` and
    /// the children are applied positionally to the result.
    DelimitedComposite {
        position_in_row: usize,
        delimiter: String,
        children: Vec<FieldDefinition>,
    },

    /// Character range `[start_position, start_position + field_length)`
    /// within a line.
    Fixed {
        start_position: usize,
        field_length: usize,
    },

    /// Text content of the child element named `node_name`.
    Xml { node_name: String },

    /// The children are applied to the child element named `node_name`.
    XmlComposite {
        node_name: String,
        children: Vec<FieldDefinition>,
    },
}

impl FieldRule {
    /// The file format this rule belongs to.
    pub fn file_type(&self) -> FileType {
        match self {
            FieldRule::Delimited { .. } | FieldRule::DelimitedComposite { .. } => {
                FileType::Delimited
            }
            FieldRule::Fixed { .. } => FileType::Fixed,
            FieldRule::Xml { .. } | FieldRule::XmlComposite { .. } => FileType::Xml,
        }
    }

    /// Returns true for composite (nested) rules.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            FieldRule::DelimitedComposite { .. } | FieldRule::XmlComposite { .. }
        )
    }
}

/// A named extraction rule for one field of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    field_name: String,
    rule: FieldRule,
}

impl FieldDefinition {
    /// Create a field definition, validating the name and the rule.
    pub fn new(field_name: impl Into<String>, rule: FieldRule) -> Result<Self> {
        let field_name = field_name.into();
        if field_name.trim().is_empty() {
            return Err(DefinitionError::MissingFieldName);
        }
        match &rule {
            FieldRule::DelimitedComposite {
                delimiter,
                children,
                ..
            } => {
                if delimiter.is_empty() {
                    return Err(DefinitionError::MissingNestedDelimiter { field: field_name });
                }
                validate_children(&field_name, children, FileType::Delimited)?;
            }
            FieldRule::XmlComposite { children, .. } => {
                validate_children(&field_name, children, FileType::Xml)?;
            }
            FieldRule::Delimited { .. } | FieldRule::Fixed { .. } | FieldRule::Xml { .. } => {}
        }
        Ok(Self { field_name, rule })
    }

    /// Scalar delimited field at the given split position.
    pub fn delimited(field_name: impl Into<String>, position_in_row: usize) -> Result<Self> {
        Self::new(field_name, FieldRule::Delimited { position_in_row })
    }

    /// Scalar fixed-width field over the given character range.
    pub fn fixed(
        field_name: impl Into<String>,
        start_position: usize,
        field_length: usize,
    ) -> Result<Self> {
        Self::new(
            field_name,
            FieldRule::Fixed {
                start_position,
                field_length,
            },
        )
    }

    /// Scalar XML field whose node name defaults to the field name.
    pub fn xml(field_name: impl Into<String>) -> Result<Self> {
        let field_name = field_name.into();
        let node_name = field_name.clone();
        Self::new(field_name, FieldRule::Xml { node_name })
    }

    /// The key under which the extracted value is stored.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The extraction rule for this field.
    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }

    /// Build a field definition from a generic key/value structure.
    ///
    /// Keys may be camelCase or snake_case. The attributes consulted depend
    /// on `file_type`: fixed-width fields need `start_position` and
    /// `field_length`, delimited fields need `position_in_row`, XML fields
    /// may override `xml_node_name` (defaulting to the field name). A
    /// non-empty nested `field_definitions` array makes the field composite.
    pub fn from_value(file_type: FileType, value: &Value) -> Result<Self> {
        let attrs = normalized_object(value, "field definition")?;
        let field_name = required_string(&attrs, "field_name", DefinitionError::MissingFieldName)?;
        let children = match attrs.get("field_definitions") {
            Some(value) => Some(child_definitions(file_type, value)?),
            None => None,
        };
        let children = children.filter(|c| !c.is_empty());

        let rule = match file_type {
            FileType::Delimited => {
                let position_in_row = required_usize(&attrs, "position_in_row").ok_or_else(|| {
                    DefinitionError::MissingPositionInRow {
                        field: field_name.clone(),
                    }
                })??;
                match children {
                    Some(children) => {
                        let delimiter = optional_string(&attrs, "delimiter").ok_or_else(|| {
                            DefinitionError::MissingNestedDelimiter {
                                field: field_name.clone(),
                            }
                        })?;
                        FieldRule::DelimitedComposite {
                            position_in_row,
                            delimiter,
                            children,
                        }
                    }
                    None => FieldRule::Delimited { position_in_row },
                }
            }
            FileType::Fixed => {
                if children.is_some() {
                    return Err(DefinitionError::UnsupportedNesting { field: field_name });
                }
                let start_position = required_usize(&attrs, "start_position");
                let field_length = required_usize(&attrs, "field_length");
                match (start_position, field_length) {
                    (Some(start), Some(length)) => FieldRule::Fixed {
                        start_position: start?,
                        field_length: length?,
                    },
                    _ => {
                        return Err(DefinitionError::MissingFixedBounds { field: field_name });
                    }
                }
            }
            FileType::Xml => {
                let node_name =
                    optional_string(&attrs, "xml_node_name").unwrap_or_else(|| field_name.clone());
                match children {
                    Some(children) => FieldRule::XmlComposite {
                        node_name,
                        children,
                    },
                    None => FieldRule::Xml { node_name },
                }
            }
        };

        Self::new(field_name, rule)
    }
}

fn validate_children(
    field_name: &str,
    children: &[FieldDefinition],
    expected: FileType,
) -> Result<()> {
    if children.is_empty() {
        return Err(DefinitionError::EmptyComposite {
            field: field_name.to_string(),
        });
    }
    for child in children {
        if child.rule.file_type() != expected {
            return Err(DefinitionError::FieldFormatMismatch {
                field: child.field_name.clone(),
                expected,
            });
        }
    }
    Ok(())
}

fn child_definitions(file_type: FileType, value: &Value) -> Result<Vec<FieldDefinition>> {
    let items = value
        .as_array()
        .ok_or_else(|| DefinitionError::InvalidAttribute {
            attribute: "field_definitions".to_string(),
            message: "expected an array".to_string(),
        })?;
    items
        .iter()
        .map(|item| FieldDefinition::from_value(file_type, item))
        .collect()
}

/// Format-specific configuration of a file definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FileFormat {
    /// Lines split on a delimiter string.
    Delimited { delimiter: String, has_header: bool },
    /// Lines sliced at fixed character positions.
    Fixed { has_header: bool },
    /// An XML document whose record container holds one element per record.
    Xml { record_element: String },
}

impl FileFormat {
    /// The file type tag for this format.
    pub fn file_type(&self) -> FileType {
        match self {
            FileFormat::Delimited { .. } => FileType::Delimited,
            FileFormat::Fixed { .. } => FileType::Fixed,
            FileFormat::Xml { .. } => FileType::Xml,
        }
    }
}

/// A validated description of a file's layout and batch configuration.
///
/// Either fully valid or construction fails; there is no partially-valid
/// instance. The batch attributes (`input_directory`, `file_mask`,
/// `completed_directory`) are only consulted by the batch runner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDefinition {
    format: FileFormat,
    field_definitions: Vec<FieldDefinition>,
    input_directory: Option<PathBuf>,
    file_mask: Option<String>,
    completed_directory: Option<PathBuf>,
}

impl FileDefinition {
    /// Create a file definition, validating the format and every field.
    pub fn new(format: FileFormat, field_definitions: Vec<FieldDefinition>) -> Result<Self> {
        if field_definitions.is_empty() {
            return Err(DefinitionError::MissingFieldDefinitions);
        }
        match &format {
            FileFormat::Delimited { delimiter, .. } => {
                if delimiter.is_empty() {
                    return Err(DefinitionError::MissingDelimiter);
                }
            }
            FileFormat::Xml { record_element } => {
                if record_element.is_empty() {
                    return Err(DefinitionError::MissingRecordElement);
                }
            }
            FileFormat::Fixed { .. } => {}
        }
        let expected = format.file_type();
        for field in &field_definitions {
            if field.rule().file_type() != expected {
                return Err(DefinitionError::FieldFormatMismatch {
                    field: field.field_name().to_string(),
                    expected,
                });
            }
        }
        Ok(Self {
            format,
            field_definitions,
            input_directory: None,
            file_mask: None,
            completed_directory: None,
        })
    }

    /// Set the directory scanned by batch runs.
    #[must_use]
    pub fn with_input_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_directory = Some(path.into());
        self
    }

    /// Set the shell-glob mask matched against file names in the input
    /// directory.
    #[must_use]
    pub fn with_file_mask(mut self, mask: impl Into<String>) -> Self {
        self.file_mask = Some(mask.into());
        self
    }

    /// Set the directory successfully processed files are moved into.
    #[must_use]
    pub fn with_completed_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.completed_directory = Some(path.into());
        self
    }

    /// The format-specific configuration.
    pub fn format(&self) -> &FileFormat {
        &self.format
    }

    /// The file type tag.
    pub fn file_type(&self) -> FileType {
        self.format.file_type()
    }

    /// The ordered field definitions; output records follow this order.
    pub fn field_definitions(&self) -> &[FieldDefinition] {
        &self.field_definitions
    }

    /// The batch input directory, when configured.
    pub fn input_directory(&self) -> Option<&PathBuf> {
        self.input_directory.as_ref()
    }

    /// The batch file mask, when configured.
    pub fn file_mask(&self) -> Option<&str> {
        self.file_mask.as_deref()
    }

    /// The completion directory, when configured.
    pub fn completed_directory(&self) -> Option<&PathBuf> {
        self.completed_directory.as_ref()
    }

    /// Build a file definition from a generic key/value structure.
    ///
    /// This is the boundary to external definition sources (typically parsed
    /// JSON): keys of any casing are normalized to the canonical snake_case
    /// attribute names, then the same validation as [`FileDefinition::new`]
    /// runs. Returns the first configuration error encountered.
    pub fn from_value(value: &Value) -> Result<Self> {
        let attrs = normalized_object(value, "file definition")?;
        let file_type_raw =
            required_string(&attrs, "file_type", DefinitionError::MissingFileType)?;
        let file_type: FileType = file_type_raw.parse()?;

        let fields_value = attrs
            .get("field_definitions")
            .ok_or(DefinitionError::MissingFieldDefinitions)?;
        let field_definitions = child_definitions(file_type, fields_value)?;

        let has_header = optional_bool(&attrs, "has_header")?.unwrap_or(false);
        let format = match file_type {
            FileType::Delimited => FileFormat::Delimited {
                delimiter: optional_string(&attrs, "delimiter")
                    .ok_or(DefinitionError::MissingDelimiter)?,
                has_header,
            },
            FileType::Fixed => FileFormat::Fixed { has_header },
            FileType::Xml => FileFormat::Xml {
                record_element: optional_string(&attrs, "record_xml_element")
                    .ok_or(DefinitionError::MissingRecordElement)?,
            },
        };

        let mut definition = Self::new(format, field_definitions)?;
        if let Some(path) = optional_string(&attrs, "input_directory") {
            definition = definition.with_input_directory(path);
        }
        if let Some(mask) = optional_string(&attrs, "file_mask") {
            definition = definition.with_file_mask(mask);
        }
        if let Some(path) = optional_string(&attrs, "completed_directory") {
            definition = definition.with_completed_directory(path);
        }
        Ok(definition)
    }
}

/// Normalize a camelCase (or mixed-case) key to snake_case.
fn snake_case(key: &str) -> String {
    let mut normalized = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            if !normalized.is_empty() && !normalized.ends_with('_') {
                normalized.push('_');
            }
            normalized.push(c.to_ascii_lowercase());
        } else {
            normalized.push(c);
        }
    }
    normalized
}

fn normalized_object<'a>(value: &'a Value, what: &str) -> Result<BTreeMap<String, &'a Value>> {
    let object = value
        .as_object()
        .ok_or_else(|| DefinitionError::InvalidAttribute {
            attribute: what.to_string(),
            message: "expected a JSON object".to_string(),
        })?;
    Ok(object
        .iter()
        .map(|(key, value)| (snake_case(key), value))
        .collect())
}

/// Read a non-empty string attribute, mapping absence (or blank) to `missing`.
fn required_string(
    attrs: &BTreeMap<String, &Value>,
    attribute: &str,
    missing: DefinitionError,
) -> Result<String> {
    optional_string(attrs, attribute).ok_or(missing)
}

/// Read a string attribute; absent, null, or empty values count as unset.
fn optional_string(attrs: &BTreeMap<String, &Value>, attribute: &str) -> Option<String> {
    attrs
        .get(attribute)
        .and_then(|value| value.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read a non-negative integer attribute; `None` when absent or null.
fn required_usize(attrs: &BTreeMap<String, &Value>, attribute: &str) -> Option<Result<usize>> {
    let value = attrs.get(attribute)?;
    if value.is_null() {
        return None;
    }
    Some(
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| DefinitionError::InvalidAttribute {
                attribute: attribute.to_string(),
                message: format!("expected a non-negative integer, got {value}"),
            }),
    )
}

fn optional_bool(attrs: &BTreeMap<String, &Value>, attribute: &str) -> Result<Option<bool>> {
    match attrs.get(attribute) {
        None => Ok(None),
        Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(DefinitionError::InvalidAttribute {
            attribute: attribute.to_string(),
            message: format!("expected a boolean, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_field() -> FieldDefinition {
        FieldDefinition::delimited("name", 0).unwrap()
    }

    #[test]
    fn file_type_parses_case_insensitively() {
        assert_eq!("delimited".parse::<FileType>().unwrap(), FileType::Delimited);
        assert_eq!("FIXED".parse::<FileType>().unwrap(), FileType::Fixed);
        assert_eq!("Xml".parse::<FileType>().unwrap(), FileType::Xml);
    }

    #[test]
    fn unknown_file_type_names_the_value() {
        let error = "parquet".parse::<FileType>().unwrap_err();
        assert!(error.to_string().contains("parquet"));
    }

    #[test]
    fn blank_file_type_is_missing() {
        assert!(matches!(
            "  ".parse::<FileType>(),
            Err(DefinitionError::MissingFileType)
        ));
    }

    #[test]
    fn field_name_is_required() {
        let result = FieldDefinition::delimited("", 0);
        assert!(matches!(result, Err(DefinitionError::MissingFieldName)));
    }

    #[test]
    fn xml_node_name_defaults_to_field_name() {
        let field = FieldDefinition::xml("age").unwrap();
        assert_eq!(
            field.rule(),
            &FieldRule::Xml {
                node_name: "age".to_string()
            }
        );
    }

    #[test]
    fn composite_requires_children() {
        let result = FieldDefinition::new(
            "address",
            FieldRule::DelimitedComposite {
                position_in_row: 3,
                delimiter: "&".to_string(),
                children: vec![],
            },
        );
        assert!(matches!(result, Err(DefinitionError::EmptyComposite { .. })));
    }

    #[test]
    fn composite_requires_delimiter() {
        let result = FieldDefinition::new(
            "address",
            FieldRule::DelimitedComposite {
                position_in_row: 3,
                delimiter: String::new(),
                children: vec![name_field()],
            },
        );
        assert!(matches!(
            result,
            Err(DefinitionError::MissingNestedDelimiter { .. })
        ));
    }

    #[test]
    fn file_definition_requires_fields() {
        let result = FileDefinition::new(
            FileFormat::Fixed { has_header: false },
            vec![],
        );
        assert!(matches!(
            result,
            Err(DefinitionError::MissingFieldDefinitions)
        ));
    }

    #[test]
    fn delimited_file_requires_delimiter() {
        let result = FileDefinition::new(
            FileFormat::Delimited {
                delimiter: String::new(),
                has_header: false,
            },
            vec![name_field()],
        );
        assert!(matches!(result, Err(DefinitionError::MissingDelimiter)));
    }

    #[test]
    fn xml_file_requires_record_element() {
        let result = FileDefinition::new(
            FileFormat::Xml {
                record_element: String::new(),
            },
            vec![FieldDefinition::xml("name").unwrap()],
        );
        assert!(matches!(result, Err(DefinitionError::MissingRecordElement)));
    }

    #[test]
    fn field_rules_must_match_the_format() {
        let result = FileDefinition::new(
            FileFormat::Fixed { has_header: false },
            vec![name_field()],
        );
        assert!(matches!(
            result,
            Err(DefinitionError::FieldFormatMismatch { expected: FileType::Fixed, .. })
        ));
    }

    #[test]
    fn snake_case_normalizes_camel_case() {
        assert_eq!(snake_case("fieldName"), "field_name");
        assert_eq!(snake_case("xmlNodeName"), "xml_node_name");
        assert_eq!(snake_case("positionInRow"), "position_in_row");
        assert_eq!(snake_case("field_name"), "field_name");
        assert_eq!(snake_case("FieldName"), "field_name");
    }

    #[test]
    fn batch_attributes_round_trip() {
        let definition = FileDefinition::new(
            FileFormat::Fixed { has_header: false },
            vec![FieldDefinition::fixed("name", 0, 13).unwrap()],
        )
        .unwrap()
        .with_input_directory("input")
        .with_file_mask("*.txt")
        .with_completed_directory("completed");

        assert_eq!(definition.input_directory(), Some(&PathBuf::from("input")));
        assert_eq!(definition.file_mask(), Some("*.txt"));
        assert_eq!(
            definition.completed_directory(),
            Some(&PathBuf::from("completed"))
        );
    }
}
