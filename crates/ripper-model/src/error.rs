//! Error types for definition construction and validation.

use thiserror::Error;

use crate::definition::FileType;

/// Errors raised while constructing or validating file and field definitions.
///
/// Every variant is a configuration error: it is raised eagerly at
/// construction time (or at batch start for the directory attributes), never
/// during per-line extraction.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// A field definition was supplied without a name.
    #[error("field_name is required")]
    MissingFieldName,

    /// A file definition was supplied without a file type.
    #[error("file_type is required")]
    MissingFileType,

    /// The file type is not one of the supported formats.
    #[error("unsupported file_type: {value}")]
    UnsupportedFileType { value: String },

    /// A file definition was supplied without any field definitions.
    #[error("field_definitions is required")]
    MissingFieldDefinitions,

    /// A fixed-width field is missing its positional attributes.
    #[error("field '{field}': start_position and field_length are required for fixed-width fields")]
    MissingFixedBounds { field: String },

    /// A delimited field is missing its positional attribute.
    #[error("field '{field}': position_in_row is required for delimited fields")]
    MissingPositionInRow { field: String },

    /// A composite delimited field has no delimiter of its own.
    #[error("field '{field}': a delimiter is required for nested field definitions")]
    MissingNestedDelimiter { field: String },

    /// A composite field was declared with an empty child list.
    #[error("field '{field}': nested field_definitions must not be empty")]
    EmptyComposite { field: String },

    /// Fixed-width fields are always scalar.
    #[error("field '{field}': fixed-width fields do not support nested field definitions")]
    UnsupportedNesting { field: String },

    /// A delimited file definition has no delimiter.
    #[error("delimiter is required for delimited files")]
    MissingDelimiter,

    /// An XML file definition has no record element.
    #[error("record_xml_element is required for xml files")]
    MissingRecordElement,

    /// A field's extraction rule does not match the file's format.
    #[error("field '{field}' does not match the {expected} file format")]
    FieldFormatMismatch { field: String, expected: FileType },

    /// A batch run was requested without an input directory.
    #[error("input_directory is required for a batch run")]
    MissingInputDirectory,

    /// A batch run was requested without a file mask.
    #[error("file_mask is required for a batch run")]
    MissingFileMask,

    /// A definition attribute has the wrong shape or an out-of-range value.
    #[error("invalid value for {attribute}: {message}")]
    InvalidAttribute { attribute: String, message: String },
}

/// Result type for definition construction.
pub type Result<T> = std::result::Result<T, DefinitionError>;
