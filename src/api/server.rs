//! REST API server for the dashboard endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use super::responses::{
    ClustersResponse, CustomersResponse, DepartmentsResponse, HomeResponse, MonthRowsResponse,
    MonthsResponse, PredictRequest, ProfileResponse,
};
use crate::dashboard::{ClusterMembers, DashboardContext, DashboardStatus};
use crate::dataset::Record;
use crate::error::{Error, Result};
use crate::forecast::{parse_x, ForecastInfo, Prediction};

/// Public routes, in the order they are advertised by `/`
pub const ENDPOINTS: &[&str] = &[
    "/health",
    "/info",
    "/predict",
    "/clientes",
    "/cliente/{nombre_cliente}",
    "/departamentos",
    "/clientes_por_departamento/{departamento}",
    "/clusters",
    "/clientes_por_cluster/{cluster}",
    "/perfil_clusters",
    "/meses_favoritos",
    "/clientes_por_mes/{mes}",
];

type ApiState = Arc<DashboardContext>;

/// API server for dashboard endpoints
pub struct DashboardApiServer {
    context: ApiState,
    addr: String,
}

impl DashboardApiServer {
    pub fn new(context: ApiState, addr: impl Into<String>) -> Self {
        Self {
            context,
            addr: addr.into(),
        }
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind(&self.addr).await?;
        info!("Starting dashboard API server on {}", listener.local_addr()?);
        serve(listener, self.context).await
    }
}

/// Serve the dashboard router on an already bound listener
pub async fn serve(listener: TcpListener, context: ApiState) -> Result<()> {
    axum::serve(listener, router(context)).await?;
    Ok(())
}

/// Build the API router
pub fn router(context: ApiState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/info", get(model_info))
        .route("/predict", post(predict))
        .route("/clientes", get(list_customers))
        .route("/cliente/{name}", get(get_customer))
        .route("/departamentos", get(list_departments))
        .route(
            "/clientes_por_departamento/{department}",
            get(customers_by_department),
        )
        .route("/clusters", get(list_clusters))
        .route("/clientes_por_cluster/{cluster}", get(customers_by_cluster))
        .route("/perfil_clusters", get(cluster_profile))
        .route("/meses_favoritos", get(list_favorite_months))
        .route("/clientes_por_mes/{month}", get(customers_by_month))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(context)
}

// API Handlers

async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        status: "RFM dashboard API is running".to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

async fn health(State(state): State<ApiState>) -> Json<DashboardStatus> {
    Json(state.status())
}

async fn model_info(State(state): State<ApiState>) -> Result<Json<ForecastInfo>> {
    state.info().map(Json).inspect_err(|e| {
        warn!("Model info requested but unavailable: {}", e);
    })
}

async fn predict(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Prediction>> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected predict body: {}", rejection);
        Error::InvalidInput(rejection.body_text())
    })?;

    let prediction = match request.months_ahead {
        Some(months) => {
            let months = parse_x(Some(&months))?;
            state.forecast_months(months)?
        }
        None => state.predict(parse_x(request.x.as_ref())?)?,
    };
    Ok(Json(prediction))
}

async fn list_customers(State(state): State<ApiState>) -> Json<CustomersResponse> {
    Json(CustomersResponse {
        clientes: state.customers(),
    })
}

async fn get_customer(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<Record>> {
    state.customer(&name).map(Json).inspect_err(|e| {
        debug!("{}", e);
    })
}

async fn list_departments(State(state): State<ApiState>) -> Json<DepartmentsResponse> {
    Json(DepartmentsResponse {
        departamentos: state.departments(),
    })
}

async fn customers_by_department(
    State(state): State<ApiState>,
    Path(department): Path<String>,
) -> Json<CustomersResponse> {
    Json(CustomersResponse {
        clientes: state.customers_by_department(&department),
    })
}

async fn list_clusters(State(state): State<ApiState>) -> Json<ClustersResponse> {
    Json(ClustersResponse {
        clusters: state.clusters(),
    })
}

async fn customers_by_cluster(
    State(state): State<ApiState>,
    Path(cluster): Path<String>,
) -> Json<ClusterMembers> {
    Json(state.customers_by_cluster(&cluster))
}

async fn cluster_profile(State(state): State<ApiState>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        perfil: state.cluster_profile(),
    })
}

async fn list_favorite_months(State(state): State<ApiState>) -> Json<MonthsResponse> {
    Json(MonthsResponse {
        meses: state.favorite_months(),
    })
}

async fn customers_by_month(
    State(state): State<ApiState>,
    Path(month): Path<String>,
) -> Json<MonthRowsResponse> {
    Json(MonthRowsResponse {
        datos: state.customers_by_month(&month),
    })
}
