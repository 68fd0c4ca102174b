//! Batch directory processing: discovery and relocation.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use ripper_model::{DefinitionError, FileDefinition, FileInstance};

use crate::error::{ExtractError, Result};
use crate::extractor::rip_file;

/// Discover files matching the definition's mask, extract each one, and move
/// successfully processed files to the completed directory when configured.
///
/// Requires `input_directory` and `file_mask` on the definition. The
/// completed directory is created if absent. Files are processed in
/// enumeration order; the first extraction failure propagates immediately,
/// leaving already-relocated files relocated and the rest untouched.
pub fn find_and_rip_files(definition: &FileDefinition) -> Result<Vec<FileInstance>> {
    let input_directory = definition
        .input_directory()
        .ok_or(DefinitionError::MissingInputDirectory)?;
    let file_mask = definition
        .file_mask()
        .ok_or(DefinitionError::MissingFileMask)?;

    if let Some(completed) = definition.completed_directory() {
        fs::create_dir_all(completed).map_err(|e| ExtractError::CompletedDirCreate {
            path: completed.clone(),
            source: e,
        })?;
    }

    let pattern = input_directory.join(file_mask);
    let pattern = pattern.to_string_lossy();
    let matches = glob::glob(&pattern).map_err(|e| ExtractError::InvalidMask {
        mask: file_mask.to_string(),
        source: e,
    })?;

    let mut instances = Vec::new();
    for entry in matches {
        let path = match entry {
            Ok(path) => path,
            Err(error) => {
                return Err(ExtractError::FileRead {
                    path: error.path().to_path_buf(),
                    source: error.into_error(),
                });
            }
        };
        if !path.is_file() {
            continue;
        }
        debug!(path = %path.display(), "extracting file");
        let instance = rip_file(definition, &path)?;
        if let Some(completed) = definition.completed_directory() {
            relocate(&path, completed)?;
        }
        instances.push(instance);
    }
    info!(
        directory = %input_directory.display(),
        mask = file_mask,
        files = instances.len(),
        "batch run complete"
    );
    Ok(instances)
}

/// Rename a processed file into the completed directory. Same filesystem
/// assumed.
fn relocate(path: &Path, completed: &Path) -> Result<()> {
    let file_name = path.file_name().ok_or_else(|| ExtractError::Relocate {
        from: path.to_path_buf(),
        to: completed.to_path_buf(),
        source: io::Error::other("path has no file name"),
    })?;
    let target = completed.join(file_name);
    fs::rename(path, &target).map_err(|e| ExtractError::Relocate {
        from: path.to_path_buf(),
        to: target.clone(),
        source: e,
    })?;
    debug!(from = %path.display(), to = %target.display(), "relocated file");
    Ok(())
}
