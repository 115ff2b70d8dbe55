//! Linear forecast evaluation over pre-fit parameters
//!
//! The model is never trained here. A serialized bundle carries the slope
//! (`m`), the intercept (`b`) and the rows it was fit on (`data`); only the
//! row count of `data` is used.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Slope and intercept of the pre-fit linear model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastParams {
    pub slope: f64,
    pub intercept: f64,
}

impl ForecastParams {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// `y = slope * x + intercept`
    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// On-disk bundle layout
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastBundle {
    #[serde(alias = "slope")]
    pub m: f64,
    #[serde(alias = "intercept")]
    pub b: f64,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub modelo: Option<Value>,
}

/// Model summary served by `/info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastInfo {
    pub filas: usize,
    pub m: f64,
    pub b: f64,
}

/// Evaluated point served by `/predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub x: f64,
    pub y_pred: f64,
}

/// Loaded forecast model plus the number of rows it was fit on
#[derive(Debug, Clone)]
pub struct ForecastModel {
    params: ForecastParams,
    rows: usize,
    description: Option<Value>,
}

impl ForecastModel {
    pub fn new(params: ForecastParams, rows: usize) -> Self {
        Self {
            params,
            rows,
            description: None,
        }
    }

    /// Read and validate a JSON bundle from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let bundle: ForecastBundle = serde_json::from_str(content)?;
        Self::from_bundle(bundle)
    }

    pub fn from_bundle(bundle: ForecastBundle) -> Result<Self> {
        if !bundle.m.is_finite() || !bundle.b.is_finite() {
            return Err(Error::InvalidInput(format!(
                "model parameters must be finite (m={}, b={})",
                bundle.m, bundle.b
            )));
        }

        debug!(
            "Forecast bundle: m={}, b={}, {} rows",
            bundle.m,
            bundle.b,
            bundle.data.len()
        );

        Ok(Self {
            params: ForecastParams::new(bundle.m, bundle.b),
            rows: bundle.data.len(),
            description: bundle.modelo,
        })
    }

    pub fn params(&self) -> ForecastParams {
        self.params
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn description(&self) -> Option<&Value> {
        self.description.as_ref()
    }

    pub fn info(&self) -> ForecastInfo {
        ForecastInfo {
            filas: self.rows,
            m: self.params.slope,
            b: self.params.intercept,
        }
    }

    pub fn predict(&self, x: f64) -> Prediction {
        Prediction {
            x,
            y_pred: self.params.evaluate(x),
        }
    }
}

/// Coerce a request value into `x`: a JSON number or a numeric string
pub fn parse_x(value: Option<&Value>) -> Result<f64> {
    let x = match value {
        None | Some(Value::Null) => {
            return Err(Error::InvalidInput("missing field 'x'".to_string()))
        }
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| Error::InvalidInput(format!("could not convert {n} to float")))?,
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            Error::InvalidInput(format!("could not convert string to float: '{s}'"))
        })?,
        Some(other) => {
            return Err(Error::InvalidInput(format!(
                "could not convert {other} to float"
            )))
        }
    };

    if !x.is_finite() {
        return Err(Error::InvalidInput(format!("x must be finite, got {x}")));
    }
    Ok(x)
}

/// x-coordinate for a forecast `months_ahead` past the last observed month
pub fn horizon_x(base_offset: f64, months_ahead: f64) -> f64 {
    base_offset + months_ahead
}
