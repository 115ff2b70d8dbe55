//! Dashboard configuration: TOML file, then environment overrides

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// File looked up in the working directory when no `--config` is given
pub const LOCAL_CONFIG_FILE: &str = "rfm-dashboard.toml";

/// Get the platform configuration directory for the dashboard
pub fn get_global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "rfm", "rfm-dashboard").map(|dirs| dirs.config_dir().to_path_buf())
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub columns: ColumnNames,
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub customers: PathBuf,
    pub cluster_profile: PathBuf,
    pub model: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            customers: PathBuf::from("resultado_rfm.csv"),
            cluster_profile: PathBuf::from("perfil_clusters_rfm.csv"),
            model: PathBuf::from("MachineLearning.json"),
        }
    }
}

/// Names of the well-known customer columns in the exports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnNames {
    pub customer: String,
    pub department: String,
    pub cluster: String,
    pub favorite_month: String,
    pub recency: String,
    pub frequency: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            customer: "Cliente".to_string(),
            department: "Departamento".to_string(),
            cluster: "Cluster_RFM".to_string(),
            favorite_month: "mes_favorito".to_string(),
            recency: "recency".to_string(),
            frequency: "frequency".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForecastConfig {
    /// x-index of the last observed month
    pub base_offset: f64,
    pub preview_rows: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_offset: 31.0,
            preview_rows: 5,
        }
    }
}

impl DashboardConfig {
    /// Resolve configuration: explicit path, then `./rfm-dashboard.toml`,
    /// then the platform config dir, then defaults. Env vars apply last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match Self::discover() {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.merge_env_vars();
        Ok(config)
    }

    /// Parse a TOML file. Relative data paths resolve against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        if let Some(base) = path.parent() {
            config.data.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        get_global_config_dir()
            .map(|dir| dir.join("config.toml"))
            .filter(|path| path.exists())
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Apply `RFM_DASHBOARD_*` overrides from any lookup function
    pub fn merge_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("RFM_DASHBOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RFM_DASHBOARD_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid RFM_DASHBOARD_PORT '{}'", port),
            }
        }
        if let Some(path) = lookup("RFM_DASHBOARD_CUSTOMERS") {
            self.data.customers = PathBuf::from(path);
        }
        if let Some(path) = lookup("RFM_DASHBOARD_CLUSTER_PROFILE") {
            self.data.cluster_profile = PathBuf::from(path);
        }
        if let Some(path) = lookup("RFM_DASHBOARD_MODEL") {
            self.data.model = PathBuf::from(path);
        }
    }
}

impl DataConfig {
    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.customers,
            &mut self.cluster_profile,
            &mut self.model,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
