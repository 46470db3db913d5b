//! dm-dialect - Main entry point.
//!
//! Connects through the bundled MySQL-protocol transport and runs one
//! inspection command through the DM dialect adapter, printing JSON.

use clap::Parser;
use dm_dialect::builder::ExtensionRegistry;
use dm_dialect::config::{Command, Config};
use dm_dialect::db::{Connection, MySqlConnector};
use dm_dialect::models::Bind;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Logs go to stderr so stdout stays machine-readable
    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn run(config: &Config) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let connector = Arc::new(MySqlConnector::new(config.connect_timeout_duration()));
    let mut conn = Connection::dameng(config.connection_config(), connector)
        .with_settings(config.connection_settings());

    let mut registry = ExtensionRegistry::new();
    conn.initialize(&mut registry);

    let output = match &config.command {
        Command::Dsn => serde_json::json!({ "dsn": conn.dsn() }),
        Command::Tables => {
            let tables = conn.get_tables(&config.database).await?;
            serde_json::to_value(tables)?
        }
        Command::Fields { table } => {
            let fields = conn.get_fields(table).await?;
            serde_json::to_value(fields)?
        }
        Command::Explain { sql, params } => {
            let binds = params
                .iter()
                .enumerate()
                .map(|(i, p)| Bind::positional(i, p.clone()))
                .collect();
            conn.query(sql, binds).await?;
            serde_json::to_value(conn.get_explain().await?)?
        }
    };

    conn.close().await?;
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    info!(
        host = %config.hostname,
        database = %config.database,
        "Starting dm-dialect v{}",
        env!("CARGO_PKG_VERSION")
    );

    match run(&config).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            Err(e)
        }
    }
}
