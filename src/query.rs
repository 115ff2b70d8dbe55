//! Stateless queries over dataset tables
//!
//! Every function here is a pure scan over immutable data. Nothing errors:
//! unknown columns and unmatched values produce empty results.

use std::collections::HashSet;

use crate::dataset::{cell_text, Cell, Record, Table};

/// How a cell is compared with a query value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    CaseInsensitive,
}

impl MatchMode {
    fn normalize(self, text: &str) -> String {
        match self {
            Self::Exact => text.to_string(),
            Self::CaseInsensitive => text.to_lowercase(),
        }
    }
}

/// Unique non-missing values of `column`, in first-seen order
pub fn distinct_values(table: &Table, column: &str) -> Vec<Cell> {
    distinct_in(table.records(), column)
}

/// First record whose `column` matches `value`.
///
/// Duplicate keys are not an error: the earliest row wins.
pub fn find_by_exact_match<'a>(
    table: &'a Table,
    column: &str,
    value: &str,
    mode: MatchMode,
) -> Option<&'a Record> {
    let needle = mode.normalize(value);
    table
        .records()
        .iter()
        .find(|record| record_matches(record, column, &needle, mode))
}

/// All records whose `column` matches `value`, in table order
pub fn filter_by_column<'a>(
    table: &'a Table,
    column: &str,
    value: &str,
    mode: MatchMode,
) -> Vec<&'a Record> {
    let needle = mode.normalize(value);
    table
        .records()
        .iter()
        .filter(|record| record_matches(record, column, &needle, mode))
        .collect()
}

/// Keep only the requested columns that exist, in requested order
pub fn project<'a, I>(records: I, columns: &[&str]) -> Vec<Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .map(|record| {
            columns
                .iter()
                .filter_map(|column| {
                    record
                        .get(*column)
                        .map(|cell| (column.to_string(), cell.clone()))
                })
                .collect()
        })
        .collect()
}

/// First `n` records of the table
pub fn preview(table: &Table, n: usize) -> &[Record] {
    let records = table.records();
    &records[..n.min(records.len())]
}

/// Unique non-missing values of `column` across an already filtered set
pub fn distinct_in<'a, I>(records: I, column: &str) -> Vec<Cell>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter_map(|record| record.get(column))
        .filter(|cell| !cell.is_null())
        // 1 and "1" are different values, so key on the JSON encoding
        .filter(|cell| seen.insert(cell.to_string()))
        .cloned()
        .collect()
}

fn record_matches(record: &Record, column: &str, needle: &str, mode: MatchMode) -> bool {
    record
        .get(column)
        .and_then(cell_text)
        .map(|text| mode.normalize(&text) == needle)
        .unwrap_or(false)
}
