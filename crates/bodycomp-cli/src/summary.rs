use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{ImportOutcome, RunResult};

pub fn print_summary(result: &RunResult) {
    println!("Settings: {}", result.settings_path.display());
    if result.attachments_saved > 0 {
        println!("Attachments saved: {}", result.attachments_saved);
    }
    if let Some(date) = result.last_date {
        println!("Last imported date: {date}");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Discarded"),
        header_cell("Inserted"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_rows = 0usize;
    let mut total_discarded = 0usize;
    let mut total_inserted = 0usize;
    for file in &result.files {
        total_rows += file.rows_read;
        total_discarded += file.discarded;
        total_inserted += file.inserted;
        let name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| file.path.display().to_string());
        table.add_row(vec![
            Cell::new(name),
            Cell::new(file.rows_read),
            count_cell(file.discarded, Color::Yellow),
            count_cell(file.inserted, Color::Green),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        count_cell(total_discarded, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(total_inserted, Color::Green).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!("{}", import_line(result.import));
}

/// One-line description of what the import stage did.
fn import_line(outcome: ImportOutcome) -> String {
    match outcome {
        ImportOutcome::Imported { records, dates } => {
            format!("{records} records imported across {dates} dates")
        }
        ImportOutcome::NoRecords => "no records to import".to_string(),
        ImportOutcome::CallApiDisabled => {
            "import skipped: callAPI is disabled".to_string()
        }
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}
