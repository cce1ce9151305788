use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Run: {}", result.run_id);
    println!("Output: {}", result.output.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Records"), Cell::new(result.rows)]);
    table.add_row(vec![Cell::new("Columns"), Cell::new(result.columns)]);
    table.add_row(vec![
        Cell::new("Initial missing"),
        count_cell(result.stats.initial_missing, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Values filled"),
        count_cell(result.stats.values_filled, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Remaining missing"),
        count_cell(result.stats.remaining_missing, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Duplicates removed"),
        count_cell(result.stats.duplicates_removed, Color::Green),
    ]);
    if let Some(removed) = result.stats.empty_rows_removed {
        table.add_row(vec![
            Cell::new("Empty rows removed"),
            count_cell(removed, Color::Green),
        ]);
    }
    table.add_row(vec![
        Cell::new("Cleaned columns"),
        Cell::new(if result.stats.cleaned_columns.is_empty() {
            "-".to_string()
        } else {
            result
                .stats
                .cleaned_columns
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        }),
    ]);
    println!("{table}");
    print_outlier_table(result);
}

fn print_outlier_table(result: &RunResult) {
    if result.stats.outliers.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Outliers"),
        header_cell("Record indices"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (column, indices) in &result.stats.outliers {
        let preview: Vec<String> = indices.iter().take(10).map(ToString::to_string).collect();
        let mut rendered = preview.join(", ");
        if indices.len() > 10 {
            rendered.push_str(", …");
        }
        table.add_row(vec![
            Cell::new(column).fg(Color::Blue),
            count_cell(indices.len(), Color::Red),
            Cell::new(rendered),
        ]);
    }
    println!();
    println!("Outliers:");
    println!("{table}");
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

fn count_cell(value: usize, color: Color) -> Cell {
    if value > 0 {
        Cell::new(value).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(value)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
