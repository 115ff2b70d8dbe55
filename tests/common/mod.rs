//! Common test utilities and helpers

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CUSTOMERS_CSV: &str = "\
Cliente,Departamento,Cluster_RFM,mes_favorito,recency,frequency,monetary
Ana,Antioquia,0,Enero,10,3,150.5
ana,Cundinamarca,1,enero,20,1,40
Luis,Valle,0,Marzo,5,8,900
Marta,valle,2,Julio,7,2,10
Luis,Valle,0,Marzo,99,1,1
";

pub const PROFILE_CSV: &str = "\
Cluster_RFM,recency,frequency,monetary,clientes
0,7.5,4.5,300.2,3
1,20,1,40,1
2,7,2,10,1
";

pub const MODEL_JSON: &str =
    r#"{"modelo": "LinearRegression", "m": 2.0, "b": 5.0, "data": [{"x": 1}, {"x": 2}, {"x": 3}]}"#;

/// Test context builder for a dashboard data directory
pub struct DashboardFixtureBuilder {
    temp_dir: TempDir,
    customers: Option<String>,
    profile: Option<String>,
    model: Option<String>,
}

impl DashboardFixtureBuilder {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            customers: Some(CUSTOMERS_CSV.to_string()),
            profile: Some(PROFILE_CSV.to_string()),
            model: Some(MODEL_JSON.to_string()),
        }
    }

    /// Leave every data file out, as if the exports were never copied
    pub fn without_data(mut self) -> Self {
        self.customers = None;
        self.profile = None;
        self.model = None;
        self
    }

    pub fn without_model(mut self) -> Self {
        self.model = None;
        self
    }

    pub fn with_customers(mut self, csv: &str) -> Self {
        self.customers = Some(csv.to_string());
        self
    }

    pub fn build(self) -> DashboardFixture {
        let dir = self.temp_dir.path();
        for (name, content) in [
            ("customers.csv", &self.customers),
            ("profile.csv", &self.profile),
            ("model.json", &self.model),
        ] {
            if let Some(content) = content {
                fs::write(dir.join(name), content).expect("write fixture file");
            }
        }

        let config_path = dir.join("rfm-dashboard.toml");
        fs::write(
            &config_path,
            "[data]\ncustomers = \"customers.csv\"\ncluster_profile = \"profile.csv\"\nmodel = \"model.json\"\n",
        )
        .expect("write config");

        DashboardFixture {
            temp_dir: self.temp_dir,
            config_path,
        }
    }
}

/// A temp directory holding exports, a model bundle and a config file
pub struct DashboardFixture {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl DashboardFixture {
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}
