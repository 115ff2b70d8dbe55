//! CLI argument structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Serve and query RFM customer segmentation data
#[derive(Parser, Debug)]
#[command(name = "rfm-dashboard")]
#[command(about = "rfm-dashboard - Serve and query RFM customer segmentation data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Query a running dashboard API instead of loading local files
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the load outcome of every data source
    Status,

    /// Show forecast model parameters and training row count
    Info,

    /// Evaluate the forecast model at x
    Predict {
        #[arg(allow_hyphen_values = true)]
        x: f64,
    },

    /// Forecast a number of months past the last observed month
    Forecast {
        #[arg(allow_hyphen_values = true)]
        months: f64,
    },

    /// List distinct customer identifiers
    Customers,

    /// Show the first customer matching a name (case-insensitive)
    Customer { name: String },

    /// List distinct departments
    Departments,

    /// List customers in a department (case-insensitive)
    CustomersByDepartment { department: String },

    /// List distinct cluster labels
    Clusters,

    /// List customers in a cluster with a preview of their rows
    CustomersByCluster { cluster: String },

    /// Show the first rows of the cluster profile table
    ClusterProfile,

    /// List distinct favorite months
    FavoriteMonths,

    /// List customers whose favorite month matches, with recency and frequency
    CustomersByMonth { month: String },
}
