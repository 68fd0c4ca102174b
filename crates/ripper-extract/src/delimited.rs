//! Delimited file extraction.

use ripper_model::{DefinitionError, FieldDefinition, FieldRule, FieldValue, FileRow, FileType};

use crate::error::{ExtractError, Result};

/// Extract one record per line by splitting on the file-level delimiter.
///
/// The first line is dropped when `has_header` is set. Line numbers in
/// errors are 1-based over the original file, header included.
pub fn extract_rows(
    fields: &[FieldDefinition],
    delimiter: &str,
    has_header: bool,
    content: &str,
) -> Result<Vec<FileRow>> {
    let mut rows = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if has_header && index == 0 {
            continue;
        }
        let pieces: Vec<&str> = line.trim_end().split(delimiter).collect();
        rows.push(build_row(fields, &pieces, index + 1)?);
    }
    Ok(rows)
}

/// Apply field definitions positionally to the split pieces of one line.
///
/// Composite fields split their piece again on the nested delimiter and
/// recurse, so arbitrarily deep nesting follows the same rule.
fn build_row(fields: &[FieldDefinition], pieces: &[&str], line: usize) -> Result<FileRow> {
    let mut row = FileRow::new();
    for field in fields {
        match field.rule() {
            FieldRule::Delimited { position_in_row } => {
                let piece = piece_at(pieces, *position_in_row, field.field_name(), line)?;
                row.push(field.field_name(), FieldValue::Text(piece.trim().to_string()));
            }
            FieldRule::DelimitedComposite {
                position_in_row,
                delimiter,
                children,
            } => {
                let piece = piece_at(pieces, *position_in_row, field.field_name(), line)?;
                let sub_pieces: Vec<&str> = piece.trim().split(delimiter.as_str()).collect();
                let nested = build_row(children, &sub_pieces, line)?;
                row.push(field.field_name(), FieldValue::Composite(nested));
            }
            _ => {
                return Err(DefinitionError::FieldFormatMismatch {
                    field: field.field_name().to_string(),
                    expected: FileType::Delimited,
                }
                .into());
            }
        }
    }
    Ok(row)
}

fn piece_at<'a>(pieces: &[&'a str], position: usize, field: &str, line: usize) -> Result<&'a str> {
    pieces
        .get(position)
        .copied()
        .ok_or_else(|| ExtractError::FormatMismatch {
            line,
            field: field.to_string(),
            position,
            found: pieces.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::delimited("name", 0).unwrap(),
            FieldDefinition::delimited("age", 1).unwrap(),
            FieldDefinition::delimited("dob", 2).unwrap(),
        ]
    }

    const PIPE_FILE: &str = "Name|Age|DOB\n\
                             Aaron|39|09/04/1980\n\
                             Gene|61|01/15/1958\n\
                             Xander|5|11/22/2014\n\
                             Mason|12|04/13/2007\n";

    #[test]
    fn extracts_pipe_delimited_records() {
        let rows = extract_rows(&person_fields(), "|", true, PIPE_FILE).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].text("name"), Some("Aaron"));
        assert_eq!(rows[0].text("age"), Some("39"));
        assert_eq!(rows[0].text("dob"), Some("09/04/1980"));
        assert_eq!(rows[1].text("name"), Some("Gene"));
        assert_eq!(rows[2].text("name"), Some("Xander"));
        assert_eq!(rows[3].text("dob"), Some("04/13/2007"));
    }

    #[test]
    fn header_is_kept_when_not_configured() {
        let rows = extract_rows(&person_fields(), "|", false, PIPE_FILE).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].text("name"), Some("Name"));
    }

    #[test]
    fn values_are_trimmed() {
        let rows = extract_rows(&person_fields(), ",", false, "Aaron , 39 ,09/04/1980\r\n").unwrap();
        assert_eq!(rows[0].text("name"), Some("Aaron"));
        assert_eq!(rows[0].text("age"), Some("39"));
    }

    #[test]
    fn field_order_follows_definitions_not_positions() {
        let fields = vec![
            FieldDefinition::delimited("dob", 2).unwrap(),
            FieldDefinition::delimited("name", 0).unwrap(),
        ];
        let rows = extract_rows(&fields, "|", true, PIPE_FILE).unwrap();
        let names: Vec<&str> = rows[0].field_names().collect();
        assert_eq!(names, vec!["dob", "name"]);
    }

    #[test]
    fn nested_field_builds_a_composite_record() {
        let children = vec![
            FieldDefinition::delimited("line1", 0).unwrap(),
            FieldDefinition::delimited("city", 1).unwrap(),
            FieldDefinition::delimited("state", 2).unwrap(),
            FieldDefinition::delimited("zipCode", 3).unwrap(),
        ];
        let fields = vec![
            FieldDefinition::delimited("name", 0).unwrap(),
            FieldDefinition::new(
                "address",
                FieldRule::DelimitedComposite {
                    position_in_row: 1,
                    delimiter: "&".to_string(),
                    children,
                },
            )
            .unwrap(),
        ];

        let rows =
            extract_rows(&fields, "|", false, "Aaron|123 Main St&Des Moines&IA&50315\n").unwrap();

        let address = rows[0]
            .get("address")
            .and_then(FieldValue::as_composite)
            .expect("composite address");
        assert_eq!(address.text("line1"), Some("123 Main St"));
        assert_eq!(address.text("city"), Some("Des Moines"));
        assert_eq!(address.text("state"), Some("IA"));
        assert_eq!(address.text("zipCode"), Some("50315"));
    }

    #[test]
    fn short_line_aborts_with_format_mismatch() {
        let result = extract_rows(&person_fields(), "|", true, "Name|Age|DOB\nAaron|39\n");
        match result {
            Err(ExtractError::FormatMismatch {
                line,
                field,
                position,
                found,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(field, "dob");
                assert_eq!(position, 2);
                assert_eq!(found, 2);
            }
            other => panic!("expected FormatMismatch, got {other:?}"),
        }
    }

    #[test]
    fn nested_short_piece_aborts_too() {
        let fields = vec![
            FieldDefinition::new(
                "address",
                FieldRule::DelimitedComposite {
                    position_in_row: 0,
                    delimiter: "&".to_string(),
                    children: vec![
                        FieldDefinition::delimited("city", 0).unwrap(),
                        FieldDefinition::delimited("state", 1).unwrap(),
                    ],
                },
            )
            .unwrap(),
        ];
        let result = extract_rows(&fields, "|", false, "Des Moines\n");
        assert!(matches!(
            result,
            Err(ExtractError::FormatMismatch { field, .. }) if field == "state"
        ));
    }
}
