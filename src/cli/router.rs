//! Command routing and execution
//!
//! Query commands run against a local [`DashboardContext`] or, with
//! `--api-url`, against a running server through [`DashboardClient`].

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::api::DashboardApiServer;
use crate::cli::args::{Cli, Commands};
use crate::client::DashboardClient;
use crate::config::DashboardConfig;
use crate::dashboard::DashboardContext;

/// Where query commands get their answers from
pub enum Backend {
    Local(DashboardContext),
    Remote(DashboardClient),
}

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(cli: Cli) -> Result<()> {
    let mut config = DashboardConfig::load(cli.config.as_deref())?;

    let command = match cli.command {
        Commands::Serve { host, port } => {
            if cli.api_url.is_some() {
                bail!("--api-url cannot be combined with serve");
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            return run_serve(&config).await;
        }
        other => other,
    };

    let backend = match cli.api_url.as_deref() {
        Some(url) => {
            debug!("Querying remote dashboard at {}", url);
            Backend::Remote(DashboardClient::new(url)?)
        }
        None => Backend::Local(DashboardContext::load(&config)),
    };

    let output = run_query(&backend, command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_serve(config: &DashboardConfig) -> Result<()> {
    let context = DashboardContext::load(config).into_shared();
    DashboardApiServer::new(context, config.server.bind_address())
        .start()
        .await?;
    Ok(())
}

/// Answer one query command as JSON
pub async fn run_query(backend: &Backend, command: Commands) -> Result<Value> {
    let value = match backend {
        Backend::Local(ctx) => match command {
            Commands::Serve { .. } => bail!("serve is not a query command"),
            Commands::Status => to_json(ctx.status())?,
            Commands::Info => to_json(ctx.info()?)?,
            Commands::Predict { x } => to_json(ctx.predict(x)?)?,
            Commands::Forecast { months } => to_json(ctx.forecast_months(months)?)?,
            Commands::Customers => to_json(ctx.customers())?,
            Commands::Customer { name } => to_json(ctx.customer(&name)?)?,
            Commands::Departments => to_json(ctx.departments())?,
            Commands::CustomersByDepartment { department } => {
                to_json(ctx.customers_by_department(&department))?
            }
            Commands::Clusters => to_json(ctx.clusters())?,
            Commands::CustomersByCluster { cluster } => {
                to_json(ctx.customers_by_cluster(&cluster))?
            }
            Commands::ClusterProfile => to_json(ctx.cluster_profile())?,
            Commands::FavoriteMonths => to_json(ctx.favorite_months())?,
            Commands::CustomersByMonth { month } => to_json(ctx.customers_by_month(&month))?,
        },
        Backend::Remote(client) => match command {
            Commands::Serve { .. } => bail!("serve is not a query command"),
            Commands::Status => client.health().await?,
            Commands::Info => to_json(client.info().await?)?,
            Commands::Predict { x } => to_json(client.predict(x).await?)?,
            Commands::Forecast { months } => to_json(client.forecast_months(months).await?)?,
            Commands::Customers => to_json(client.customers().await?)?,
            Commands::Customer { name } => to_json(client.customer(&name).await?)?,
            Commands::Departments => to_json(client.departments().await?)?,
            Commands::CustomersByDepartment { department } => {
                to_json(client.customers_by_department(&department).await?)?
            }
            Commands::Clusters => to_json(client.clusters().await?)?,
            Commands::CustomersByCluster { cluster } => {
                to_json(client.customers_by_cluster(&cluster).await?)?
            }
            Commands::ClusterProfile => to_json(client.cluster_profile().await?)?,
            Commands::FavoriteMonths => to_json(client.favorite_months().await?)?,
            Commands::CustomersByMonth { month } => {
                to_json(client.customers_by_month(&month).await?)?
            }
        },
    };
    Ok(value)
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
