//! # rfm-dashboard
//!
//! A read-only analytics dashboard over precomputed RFM (recency, frequency,
//! monetary) customer segmentation exports and a pre-fit linear forecast.
//!
//! ## Usage
//!
//! ```bash
//! rfm-dashboard serve --port 5001
//! rfm-dashboard customers-by-month enero
//! rfm-dashboard --api-url http://127.0.0.1:5001 predict 37
//! ```
//!
//! ## Modules
//!
//! - `dataset` - CSV-backed tables and the dataset store with per-source load outcomes
//! - `query` - Pure lookups: distinct values, matching, projection, preview
//! - `forecast` - Forecast bundle loading and linear evaluation
//! - `dashboard` - The shared context and one operation per route
//! - `api` - axum HTTP server
//! - `client` - HTTP client for a running server
//! - `cli` - Command-line interface
//! - `config` - TOML configuration with environment overrides
pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod forecast;
pub mod query;

pub use dashboard::DashboardContext;
pub use error::{Error, Result};
