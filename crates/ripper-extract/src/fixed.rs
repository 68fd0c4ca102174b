//! Fixed-width file extraction.

use ripper_model::{DefinitionError, FieldDefinition, FieldRule, FieldValue, FileRow, FileType};

use crate::error::{ExtractError, Result};

/// Extract one record per line by slicing fixed character ranges.
///
/// Ranges are measured in characters against the right-trimmed line; a field
/// ending past the trimmed length is a bounds error. Fixed-width fields are
/// always scalar.
pub fn extract_rows(
    fields: &[FieldDefinition],
    has_header: bool,
    content: &str,
) -> Result<Vec<FileRow>> {
    let mut rows = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if has_header && index == 0 {
            continue;
        }
        rows.push(build_row(fields, line.trim_end(), index + 1)?);
    }
    Ok(rows)
}

fn build_row(fields: &[FieldDefinition], line: &str, line_number: usize) -> Result<FileRow> {
    let chars: Vec<char> = line.chars().collect();
    let mut row = FileRow::new();
    for field in fields {
        let FieldRule::Fixed {
            start_position,
            field_length,
        } = field.rule()
        else {
            return Err(DefinitionError::FieldFormatMismatch {
                field: field.field_name().to_string(),
                expected: FileType::Fixed,
            }
            .into());
        };
        let end = start_position + field_length;
        if end > chars.len() {
            return Err(ExtractError::FieldOutOfBounds {
                line: line_number,
                field: field.field_name().to_string(),
                end,
                length: chars.len(),
            });
        }
        let value: String = chars[*start_position..end].iter().collect();
        row.push(field.field_name(), FieldValue::Text(value.trim().to_string()));
    }
    Ok(row)
}
