//! Plain-text rendering of the table and extracted lists.
//!
//! The console output exists so a user can spot silent omissions —
//! attributes that fell out of the table, empty extractions — without
//! opening the CSV files.

use crate::table::InitTable;

/// Render the initialization table as an aligned text block.
pub fn render_table(table: &InitTable) -> String {
    let mut widths: Vec<usize> = table.columns.iter().map(String::len).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(widths.len());
            cells.push(row.id.to_string());
            cells.extend(row.values.iter().map(|v| v.to_string()));
            cells
        })
        .collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let separator: String = widths
        .iter()
        .map(|w| "-".repeat(*w + 2))
        .collect::<Vec<_>>()
        .join("+");

    let mut out = String::new();
    push_row(&mut out, &widths, &table.columns);
    out.push_str(&separator);
    out.push('\n');
    for row in &rows {
        push_row(&mut out, &widths, row);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, widths: &[usize], cells: &[S]) {
    let rendered: Vec<String> = widths
        .iter()
        .zip(cells)
        .map(|(&width, cell)| format!(" {:<width$} ", cell.as_ref()))
        .collect();
    out.push_str(rendered.join("|").trim_end());
    out.push('\n');
}

/// Render a one-line-per-pair listing, e.g. the data-type pairs.
pub fn render_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(left, right)| format!("{left}: {right}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single extracted list as one comma-separated line.
pub fn render_row(items: &[String]) -> String {
    items.join(", ")
}
