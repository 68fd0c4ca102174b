//! Format dispatch and per-file extraction entry points.

use std::fs;
use std::path::{Path, PathBuf};

use ripper_model::{FileDefinition, FileFormat, FileInstance};

use crate::error::{ExtractError, Result};
use crate::{delimited, fixed, xml};

/// Extract the records of one file's content according to its definition.
///
/// Dispatch over the format is exhaustive: the definition layer rejects
/// unknown file types before they can reach this point.
pub fn extract_records(
    definition: &FileDefinition,
    file_name: &str,
    content: &str,
) -> Result<FileInstance> {
    let fields = definition.field_definitions();
    let rows = match definition.format() {
        FileFormat::Delimited {
            delimiter,
            has_header,
        } => delimited::extract_rows(fields, delimiter, *has_header, content)?,
        FileFormat::Fixed { has_header } => fixed::extract_rows(fields, *has_header, content)?,
        FileFormat::Xml { record_element } => xml::extract_rows(fields, record_element, content)?,
    };
    Ok(FileInstance::new(file_name, rows))
}

/// Read one file fully into memory and extract its records.
pub fn rip_file(definition: &FileDefinition, path: &Path) -> Result<FileInstance> {
    let content = fs::read_to_string(path).map_err(|e| ExtractError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    extract_records(definition, &path.display().to_string(), &content)
}

/// Extract records from a list of files, stopping at the first failure.
pub fn rip_files(definition: &FileDefinition, paths: &[PathBuf]) -> Result<Vec<FileInstance>> {
    paths.iter().map(|path| rip_file(definition, path)).collect()
}
