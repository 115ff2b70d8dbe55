//! Dashboard context and the operations both presentation layers call
//!
//! [`DashboardContext`] is built once at startup and shared by handle. Each
//! method corresponds to one HTTP route and one CLI command.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::config::{ColumnNames, DashboardConfig};
use crate::dataset::{Cell, DatasetStore, LoadOutcome, Record, SourceStatus};
use crate::error::{Error, Result};
use crate::forecast::{ForecastInfo, ForecastModel, Prediction};
use crate::query::{self, MatchMode};

/// Customers in one cluster plus a preview of their rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMembers {
    pub cluster: String,
    pub clientes: Vec<Cell>,
    pub preview: Vec<Record>,
}

/// Load state of every source, for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStatus {
    pub healthy: bool,
    pub sources: Vec<SourceStatus>,
    /// `modelo` label from the forecast bundle, when it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modelo: Option<Value>,
}

/// Shared, read-only state behind every dashboard operation
#[derive(Debug)]
pub struct DashboardContext {
    store: DatasetStore,
    model: std::result::Result<ForecastModel, String>,
    model_status: SourceStatus,
    columns: ColumnNames,
    base_offset: f64,
    preview_rows: usize,
}

impl DashboardContext {
    /// Load every source named by the configuration. Never fails: each
    /// source degrades independently and records its outcome.
    pub fn load(config: &DashboardConfig) -> Self {
        let store = DatasetStore::load(&config.data.customers, &config.data.cluster_profile);
        let result = ForecastModel::load(&config.data.model);
        let model_status =
            SourceStatus::record("model", &config.data.model, &result, ForecastModel::rows);

        Self {
            store,
            model: result.map_err(|e| e.to_string()),
            model_status,
            columns: config.columns.clone(),
            base_offset: config.forecast.base_offset,
            preview_rows: config.forecast.preview_rows,
        }
    }

    /// Assemble a context from in-memory parts
    pub fn new(
        store: DatasetStore,
        model: Option<ForecastModel>,
        config: &DashboardConfig,
    ) -> Self {
        let outcome = match &model {
            Some(model) => LoadOutcome::Loaded { rows: model.rows() },
            None => LoadOutcome::Failed {
                reason: "not provided".to_string(),
            },
        };

        Self {
            store,
            model: model.ok_or_else(|| "not provided".to_string()),
            model_status: SourceStatus {
                source: "model".to_string(),
                path: config.data.model.clone(),
                outcome,
            },
            columns: config.columns.clone(),
            base_offset: config.forecast.base_offset,
            preview_rows: config.forecast.preview_rows,
        }
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn status(&self) -> DashboardStatus {
        let sources: Vec<SourceStatus> = self
            .store
            .statuses()
            .iter()
            .cloned()
            .chain(std::iter::once(self.model_status.clone()))
            .collect();

        DashboardStatus {
            healthy: sources.iter().all(|s| s.outcome.is_loaded()),
            sources,
            modelo: self
                .model
                .as_ref()
                .ok()
                .and_then(ForecastModel::description)
                .cloned(),
        }
    }

    fn model(&self) -> Result<&ForecastModel> {
        self.model
            .as_ref()
            .map_err(|reason| Error::ModelUnavailable(reason.clone()))
    }

    pub fn info(&self) -> Result<ForecastInfo> {
        self.model().map(ForecastModel::info)
    }

    /// Evaluate the model at `x`. Non-finite input or output is a value error.
    pub fn predict(&self, x: f64) -> Result<Prediction> {
        if !x.is_finite() {
            return Err(Error::InvalidInput(format!("x must be finite, got {x}")));
        }
        let prediction = self.model()?.predict(x);
        if !prediction.y_pred.is_finite() {
            return Err(Error::InvalidInput(format!(
                "prediction for x={x} is out of range"
            )));
        }
        debug!("Predicted y={} for x={}", prediction.y_pred, prediction.x);
        Ok(prediction)
    }

    /// Forecast `months_ahead` months past the last observed month
    pub fn forecast_months(&self, months_ahead: f64) -> Result<Prediction> {
        if !months_ahead.is_finite() {
            return Err(Error::InvalidInput(format!(
                "months_ahead must be finite, got {months_ahead}"
            )));
        }
        self.predict(crate::forecast::horizon_x(self.base_offset, months_ahead))
    }

    pub fn customers(&self) -> Vec<Cell> {
        query::distinct_values(self.store.customers(), &self.columns.customer)
    }

    /// First customer whose id matches `name` case-insensitively
    pub fn customer(&self, name: &str) -> Result<Record> {
        query::find_by_exact_match(
            self.store.customers(),
            &self.columns.customer,
            name.trim(),
            MatchMode::CaseInsensitive,
        )
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("Customer '{name}' not found")))
    }

    pub fn departments(&self) -> Vec<Cell> {
        query::distinct_values(self.store.customers(), &self.columns.department)
    }

    pub fn customers_by_department(&self, department: &str) -> Vec<Cell> {
        let rows = query::filter_by_column(
            self.store.customers(),
            &self.columns.department,
            department.trim(),
            MatchMode::CaseInsensitive,
        );
        query::distinct_in(rows, &self.columns.customer)
    }

    pub fn clusters(&self) -> Vec<Cell> {
        query::distinct_values(self.store.customers(), &self.columns.cluster)
    }

    /// Cluster labels are matched exactly on their text form. An unknown
    /// cluster keeps the full shape: `{cluster, clientes: [], preview: []}`.
    pub fn customers_by_cluster(&self, cluster: &str) -> ClusterMembers {
        let cluster = cluster.trim();
        let rows = query::filter_by_column(
            self.store.customers(),
            &self.columns.cluster,
            cluster,
            MatchMode::Exact,
        );

        ClusterMembers {
            cluster: cluster.to_string(),
            clientes: query::distinct_in(rows.iter().copied(), &self.columns.customer),
            preview: rows
                .into_iter()
                .take(self.preview_rows)
                .cloned()
                .collect(),
        }
    }

    pub fn cluster_profile(&self) -> Vec<Record> {
        query::preview(self.store.cluster_profile(), self.preview_rows).to_vec()
    }

    pub fn favorite_months(&self) -> Vec<Cell> {
        query::distinct_values(self.store.customers(), &self.columns.favorite_month)
    }

    /// Customers whose favorite month matches, reduced to id, recency and frequency
    pub fn customers_by_month(&self, month: &str) -> Vec<Record> {
        let rows = query::filter_by_column(
            self.store.customers(),
            &self.columns.favorite_month,
            month.trim(),
            MatchMode::CaseInsensitive,
        );
        let columns = [
            self.columns.customer.as_str(),
            self.columns.recency.as_str(),
            self.columns.frequency.as_str(),
        ];
        query::project(rows, &columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Table;
    use crate::forecast::ForecastParams;
    use serde_json::json;

    fn table(columns: &[&str], rows: Vec<Vec<&str>>) -> Table {
        Table::from_text_rows(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn context() -> DashboardContext {
        let customers = table(
            &[
                "Cliente",
                "Departamento",
                "Cluster_RFM",
                "mes_favorito",
                "recency",
                "frequency",
                "monetary",
            ],
            vec![
                vec!["Ana", "X", "0", "Enero", "10", "3", "100.5"],
                vec!["ana", "Y", "1", "enero", "20", "1", "50"],
                vec!["Luis", "Z", "0", "Marzo", "5", "8", "900"],
                vec!["Marta", "z", "2", "", "7", "2", "10"],
            ],
        );
        let profile = table(
            &["Cluster_RFM", "recency", "frequency"],
            (0..7).map(|_| vec!["0", "1.5", "2"]).collect(),
        );

        DashboardContext::new(
            DatasetStore::from_tables(customers, profile),
            Some(ForecastModel::new(ForecastParams::new(2.0, 5.0), 12)),
            &DashboardConfig::default(),
        )
    }

    #[test]
    fn test_customer_lists() {
        let ctx = context();
        assert_eq!(
            ctx.customers(),
            vec![json!("Ana"), json!("ana"), json!("Luis"), json!("Marta")]
        );
        assert_eq!(ctx.departments(), vec![json!("X"), json!("Y"), json!("Z"), json!("z")]);
        assert_eq!(ctx.clusters(), vec![json!(0), json!(1), json!(2)]);
        assert_eq!(ctx.favorite_months(), vec![json!("Enero"), json!("enero"), json!("Marzo")]);
    }

    #[test]
    fn test_customer_lookup_is_case_insensitive() {
        let ctx = context();
        let record = ctx.customer("ANA").unwrap();
        assert_eq!(record["Departamento"], json!("X"));
        assert!(matches!(ctx.customer("Pedro"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_customers_by_department() {
        let ctx = context();
        assert_eq!(
            ctx.customers_by_department("Z"),
            vec![json!("Luis"), json!("Marta")]
        );
        assert!(ctx.customers_by_department("Q").is_empty());
    }

    #[test]
    fn test_customers_by_cluster() {
        let ctx = context();
        let members = ctx.customers_by_cluster(" 0 ");
        assert_eq!(members.cluster, "0");
        assert_eq!(members.clientes, vec![json!("Ana"), json!("Luis")]);
        assert_eq!(members.preview.len(), 2);

        let empty = ctx.customers_by_cluster("9");
        assert!(empty.clientes.is_empty());
        assert!(empty.preview.is_empty());
    }

    #[test]
    fn test_cluster_profile_preview() {
        let ctx = context();
        assert_eq!(ctx.cluster_profile().len(), 5);
    }

    #[test]
    fn test_customers_by_month_projection() {
        let ctx = context();
        let rows = ctx.customers_by_month("ENERO");
        assert_eq!(rows.len(), 2);
        assert_eq!(
            serde_json::to_value(&rows[0]).unwrap(),
            json!({"Cliente": "Ana", "recency": 10, "frequency": 3})
        );
        assert!(ctx.customers_by_month("Julio").is_empty());
    }

    #[test]
    fn test_forecast_operations() {
        let ctx = context();
        assert_eq!(ctx.info().unwrap().filas, 12);
        assert_eq!(ctx.predict(10.0).unwrap().y_pred, 25.0);
        assert_eq!(ctx.forecast_months(1.0).unwrap().x, 32.0);
        assert!(matches!(
            ctx.forecast_months(f64::NAN),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_predict_rejects_non_finite_x() {
        let ctx = context();
        for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(ctx.predict(x), Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_predict_rejects_overflowing_result() {
        let ctx = context();
        let err = ctx.predict(1e308).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_reports_model_label() {
        let model = ForecastModel::from_json(r#"{"modelo": "LinearRegression", "m": 1, "b": 0}"#)
            .unwrap();
        let ctx = DashboardContext::new(
            DatasetStore::from_tables(Table::empty(), Table::empty()),
            Some(model),
            &DashboardConfig::default(),
        );
        let status = serde_json::to_value(ctx.status()).unwrap();
        assert_eq!(status["modelo"], json!("LinearRegression"));

        assert!(serde_json::to_value(context().status())
            .unwrap()
            .get("modelo")
            .is_none());
    }

    #[test]
    fn test_empty_store_and_missing_model() {
        let ctx = DashboardContext::new(
            DatasetStore::from_tables(Table::empty(), Table::empty()),
            None,
            &DashboardConfig::default(),
        );

        assert!(ctx.customers().is_empty());
        assert!(ctx.departments().is_empty());
        assert!(ctx.clusters().is_empty());
        assert!(ctx.favorite_months().is_empty());
        assert!(ctx.cluster_profile().is_empty());
        assert!(ctx.customers_by_month("enero").is_empty());
        assert!(ctx.customers_by_cluster("0").clientes.is_empty());
        assert!(matches!(ctx.info(), Err(Error::ModelUnavailable(_))));
        assert!(matches!(ctx.predict(1.0), Err(Error::ModelUnavailable(_))));
        assert!(!ctx.status().healthy);
    }
}
