//! Table linearization.
//!
//! A table block is flattened into a deterministic inline text form:
//! one physical line per row with cells joined by `" | "`, wrapped in
//! marker lines so downstream consumers can find table regions by plain
//! string search. This is lossy and display-oriented; merged cells arrive
//! already expanded by the extractor and are repeated verbatim.

use crate::normalize::normalize_line;

/// Marker line opening a linearized table.
pub const TABLE_START: &str = "[TABLE START]";

/// Marker line closing a linearized table.
pub const TABLE_END: &str = "[TABLE END]";

/// Linearize a row-major cell grid into output lines, markers included.
///
/// Rows whose cells are all empty after normalization are skipped.
pub fn linearize(rows: &[Vec<String>]) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(TABLE_START.to_string());
    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| normalize_line(cell)).collect();
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        lines.push(cells.join(" | "));
    }
    lines.push(TABLE_END.to_string());
    lines
}

/// Serialize a grid to a single string; the repetition heuristic uses this
/// as a table's identity to drop duplicated boilerplate tables.
pub fn serialize_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| normalize_line(cell))
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
