//! Dataset store holding the customer and cluster-profile tables

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::loader::read_csv_table;
use super::table::Table;
use crate::error::Result;

/// How loading a single source went.
///
/// A source that loaded but has no rows is `Loaded { rows: 0 }`, never `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded { rows: usize },
    Failed { reason: String },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Outcome of one named source, reported at the boundary
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub source: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: LoadOutcome,
}

impl SourceStatus {
    /// Wrap a load attempt, logging the result
    pub fn record<T>(
        source: &str,
        path: &Path,
        result: &Result<T>,
        rows: impl Fn(&T) -> usize,
    ) -> Self {
        let outcome = match result {
            Ok(value) => {
                let rows = rows(value);
                info!("Loaded {} from {} ({} rows)", source, path.display(), rows);
                LoadOutcome::Loaded { rows }
            }
            Err(e) => {
                warn!("Failed to load {} from {}: {}", source, path.display(), e);
                LoadOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        Self {
            source: source.to_string(),
            path: path.to_path_buf(),
            outcome,
        }
    }
}

/// Read-only holder for both tables, created once at startup
#[derive(Debug, Clone)]
pub struct DatasetStore {
    customers: Table,
    cluster_profile: Table,
    statuses: Vec<SourceStatus>,
}

impl DatasetStore {
    /// Load both sources independently. A failed source degrades to an empty table.
    pub fn load(customers_path: &Path, cluster_profile_path: &Path) -> Self {
        let (customers, customers_status) = load_source("customers", customers_path);
        let (cluster_profile, profile_status) =
            load_source("cluster_profile", cluster_profile_path);

        Self {
            customers,
            cluster_profile,
            statuses: vec![customers_status, profile_status],
        }
    }

    /// Build a store from already materialized tables
    pub fn from_tables(customers: Table, cluster_profile: Table) -> Self {
        let statuses = vec![
            SourceStatus {
                source: "customers".to_string(),
                path: PathBuf::new(),
                outcome: LoadOutcome::Loaded {
                    rows: customers.len(),
                },
            },
            SourceStatus {
                source: "cluster_profile".to_string(),
                path: PathBuf::new(),
                outcome: LoadOutcome::Loaded {
                    rows: cluster_profile.len(),
                },
            },
        ];

        Self {
            customers,
            cluster_profile,
            statuses,
        }
    }

    pub fn customers(&self) -> &Table {
        &self.customers
    }

    pub fn cluster_profile(&self) -> &Table {
        &self.cluster_profile
    }

    pub fn statuses(&self) -> &[SourceStatus] {
        &self.statuses
    }
}

fn load_source(source: &str, path: &Path) -> (Table, SourceStatus) {
    let result = read_csv_table(path);
    let status = SourceStatus::record(source, path, &result, Table::len);
    (result.unwrap_or_default(), status)
}
