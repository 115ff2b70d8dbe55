//! In-memory tables built from spreadsheet exports

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// A single coerced spreadsheet cell. `Value::Null` marks a missing value.
pub type Cell = Value;

/// One row, keyed by column name in header order
pub type Record = Map<String, Value>;

/// Text that spreadsheet exports use for missing values
const MISSING_MARKERS: &[&str] = &["", "NaN", "nan", "NA", "N/A", "null", "NULL"];

/// Immutable table: ordered columns plus ordered records
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Build a table from raw text rows, coercing every cell.
    ///
    /// Short rows are padded with missing cells; extra trailing fields are dropped.
    pub fn from_text_rows<I, R, S>(columns: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let records = rows
            .into_iter()
            .map(|row| {
                let mut fields = row.into_iter();
                columns
                    .iter()
                    .map(|column| {
                        let cell = fields
                            .next()
                            .map(|raw| coerce_cell(raw.as_ref()))
                            .unwrap_or(Value::Null);
                        (column.clone(), cell)
                    })
                    .collect::<Record>()
            })
            .collect();

        Self { columns, records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Coerce raw cell text into a typed value.
///
/// Integers win over floats so identifiers like `42` stay integral.
pub fn coerce_cell(raw: &str) -> Cell {
    let text = raw.trim();
    if MISSING_MARKERS.contains(&text) {
        return Value::Null;
    }
    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = text.parse::<f64>() {
        // inf and NaN spellings are not JSON numbers
        return Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.to_string()));
    }
    match text {
        "true" | "True" | "TRUE" => Value::Bool(true),
        "false" | "False" | "FALSE" => Value::Bool(false),
        _ => Value::String(text.to_string()),
    }
}

/// Textual form used for matching. Missing cells have none.
pub fn cell_text(cell: &Cell) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
