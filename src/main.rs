//! Attendance MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to work with an attendance database: employees, leave requests and
//! per-year leave balances.

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use attendance_mcp_server::config::Config;
use attendance_mcp_server::dispatch::Dispatcher;
use attendance_mcp_server::store::mysql::MySqlStore;
use attendance_mcp_server::transport::StdioTransport;

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json().with_writer(std::io::stderr)).init();
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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Logs go to stderr; stdout belongs to the MCP protocol
    if config.enable_logs {
        init_tracing(&config);
    }

    if let Err(message) = config.validate() {
        eprintln!("Error: invalid configuration: {}", message);
        std::process::exit(1);
    }

    info!(
        database = %config.db_name,
        "Starting Attendance MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let store = match MySqlStore::connect(&config).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "Failed to connect to database");
            eprintln!("Error: failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let dispatcher = Arc::new(Dispatcher::new(store, config.db_name.clone()));
    let transport = StdioTransport::new(dispatcher);

    if let Err(e) = transport.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
