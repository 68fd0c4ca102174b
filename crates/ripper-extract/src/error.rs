//! Error types for record extraction and batch processing.

use std::path::PathBuf;

use thiserror::Error;

use ripper_model::DefinitionError;

/// Errors that can occur while extracting records or running a batch.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Invalid or incomplete definition (including missing batch directories).
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    // === File System Errors ===
    /// Failed to read a source file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file mask is not a valid glob pattern.
    #[error("invalid file_mask '{mask}': {source}")]
    InvalidMask {
        mask: String,
        #[source]
        source: glob::PatternError,
    },

    /// Failed to create the completed directory.
    #[error("failed to create completed directory {path}: {source}")]
    CompletedDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move a processed file to the completed directory.
    #[error("failed to move {from} to {to}: {source}")]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Extraction Errors ===
    /// A delimited line split into fewer pieces than a field references.
    #[error(
        "line {line}: field '{field}' references position {position} \
         but the line split into {found} fields"
    )]
    FormatMismatch {
        line: usize,
        field: String,
        position: usize,
        found: usize,
    },

    /// A fixed-width field extends past the end of the line.
    #[error("line {line}: field '{field}' extends past the end of the line ({end} > {length})")]
    FieldOutOfBounds {
        line: usize,
        field: String,
        end: usize,
        length: usize,
    },

    /// An XML record is missing an expected element.
    #[error("record {record}: missing element '{element}' for field '{field}'")]
    MissingElement {
        record: usize,
        field: String,
        element: String,
    },

    /// The configured record element is absent from the document.
    #[error("missing record element '{element}'")]
    MissingRecordContainer { element: String },

    /// The document is not well-formed XML.
    #[error("failed to parse XML: {0}")]
    XmlParse(#[from] quick_xml::Error),
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
