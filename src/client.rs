//! HTTP client for a running dashboard API
//!
//! Used by the CLI in remote mode so the same commands work against a
//! deployed server instead of local files.

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::api::{
    ClustersResponse, CustomersResponse, DepartmentsResponse, ErrorBody, MonthRowsResponse,
    MonthsResponse, ProfileResponse,
};
use crate::dashboard::ClusterMembers;
use crate::dataset::{Cell, Record};
use crate::error::{Error, Result};
use crate::forecast::{ForecastInfo, Prediction};

pub struct DashboardClient {
    http: Client,
    base: Url,
}

impl DashboardClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid API URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!("invalid API URL '{base_url}'")));
        }

        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url(segments);
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    pub async fn health(&self) -> Result<serde_json::Value> {
        self.get(&["health"]).await
    }

    pub async fn info(&self) -> Result<ForecastInfo> {
        self.get(&["info"]).await
    }

    pub async fn predict(&self, x: f64) -> Result<Prediction> {
        let url = self.url(&["predict"]);
        debug!("POST {}", url);
        let response = self.http.post(url).json(&json!({ "x": x })).send().await?;
        decode(response).await
    }

    pub async fn forecast_months(&self, months_ahead: f64) -> Result<Prediction> {
        let url = self.url(&["predict"]);
        let response = self
            .http
            .post(url)
            .json(&json!({ "months_ahead": months_ahead }))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn customers(&self) -> Result<Vec<Cell>> {
        let body: CustomersResponse = self.get(&["clientes"]).await?;
        Ok(body.clientes)
    }

    pub async fn customer(&self, name: &str) -> Result<Record> {
        self.get(&["cliente", name]).await
    }

    pub async fn departments(&self) -> Result<Vec<Cell>> {
        let body: DepartmentsResponse = self.get(&["departamentos"]).await?;
        Ok(body.departamentos)
    }

    pub async fn customers_by_department(&self, department: &str) -> Result<Vec<Cell>> {
        let body: CustomersResponse = self
            .get(&["clientes_por_departamento", department])
            .await?;
        Ok(body.clientes)
    }

    pub async fn clusters(&self) -> Result<Vec<Cell>> {
        let body: ClustersResponse = self.get(&["clusters"]).await?;
        Ok(body.clusters)
    }

    pub async fn customers_by_cluster(&self, cluster: &str) -> Result<ClusterMembers> {
        self.get(&["clientes_por_cluster", cluster]).await
    }

    pub async fn cluster_profile(&self) -> Result<Vec<Record>> {
        let body: ProfileResponse = self.get(&["perfil_clusters"]).await?;
        Ok(body.perfil)
    }

    pub async fn favorite_months(&self) -> Result<Vec<Cell>> {
        let body: MonthsResponse = self.get(&["meses_favoritos"]).await?;
        Ok(body.meses)
    }

    pub async fn customers_by_month(&self, month: &str) -> Result<Vec<Record>> {
        let body: MonthRowsResponse = self.get(&["clientes_por_mes", month]).await?;
        Ok(body.datos)
    }
}

/// Turn a response into `T`, mapping API error bodies back to [`Error`]
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(match status {
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::BAD_REQUEST => Error::InvalidInput(message),
        other => Error::HttpStatus {
            status: other.as_u16(),
            message,
        },
    })
}
