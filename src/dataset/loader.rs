//! CSV readers for the spreadsheet exports

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};

use super::table::Table;
use crate::error::Result;

/// Read a CSV export from disk into a [`Table`]
pub fn read_csv_table(path: &Path) -> Result<Table> {
    debug!("Reading CSV table from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_csv_from(file)
}

/// Read CSV data from any reader. The first record is the header row.
pub fn read_csv_from<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = unique_columns(headers.iter());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    trace!("Parsed {} rows across {} columns", rows.len(), columns.len());
    Ok(Table::from_text_rows(columns, rows))
}

/// Trim header names, drop a UTF-8 BOM and disambiguate repeated names with `.N` suffixes
fn unique_columns<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .enumerate()
        .map(|(index, raw)| {
            let name = if index == 0 {
                raw.trim_start_matches('\u{feff}').trim()
            } else {
                raw.trim()
            };
            let base = if name.is_empty() {
                format!("Unnamed: {index}")
            } else {
                name.to_string()
            };

            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}.{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}
