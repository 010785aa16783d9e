//! Row helpers.
//!
//! A row is an ordered list of string cells aligned to its table's header.
//! Rows written before a column existed may be shorter than the header, so
//! every read goes through [`cell`].

/// One stored row.
pub type Row = Vec<String>;

/// The cell at `column`, or `""` when the row is too short.
#[must_use]
pub fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map_or("", String::as_str)
}

/// Whether the row has no non-empty cell.
#[must_use]
pub fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// Whether the cell at `column` equals `value`.
///
/// A missing cell never matches, not even an empty `value`.
#[must_use]
pub fn cell_equals(row: &[String], column: usize, value: &str) -> bool {
    row.get(column).is_some_and(|c| c == value)
}
