use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ripper_model::FileDefinition;

use crate::commands::PassResult;

/// Print the per-file results of one batch pass.
pub fn print_pass_summary(result: &PassResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Definition"),
        header_cell("Format"),
        header_cell("File"),
        header_cell("Records"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);

    for batch in &result.batches {
        if batch.instances.is_empty() {
            table.add_row(vec![
                Cell::new(batch.definition),
                Cell::new(&batch.file_type),
                dim_cell("(no matching files)"),
                dim_cell("-"),
            ]);
            continue;
        }
        for instance in &batch.instances {
            table.add_row(vec![
                Cell::new(batch.definition),
                Cell::new(&batch.file_type),
                Cell::new(instance.file_name()),
                Cell::new(instance.len()),
            ]);
        }
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!("{} files", result.total_files())).add_attribute(Attribute::Bold),
        Cell::new(result.total_records()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

/// Print what a validated definitions file declares.
pub fn print_check_summary(definitions: &[FileDefinition]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Definition"),
        header_cell("Format"),
        header_cell("Fields"),
        header_cell("Input"),
        header_cell("Mask"),
        header_cell("Completed"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    for (index, definition) in definitions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(definition.file_type()),
            Cell::new(definition.field_definitions().len()),
            path_cell(definition.input_directory().map(|p| p.display().to_string())),
            path_cell(definition.file_mask().map(str::to_string)),
            path_cell(
                definition
                    .completed_directory()
                    .map(|p| p.display().to_string()),
            ),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Dim)
}

fn path_cell(value: Option<String>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
