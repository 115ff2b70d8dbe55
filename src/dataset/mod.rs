//! Read-only tabular data loaded once at startup

pub mod loader;
pub mod store;
pub mod table;

pub use loader::{read_csv_from, read_csv_table};
pub use store::{DatasetStore, LoadOutcome, SourceStatus};
pub use table::{cell_text, coerce_cell, Cell, Record, Table};
