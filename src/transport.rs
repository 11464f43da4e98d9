//! Stdio transport for the MCP server.
//!
//! Reads JSON-RPC messages from stdin and writes responses to stdout,
//! following the MCP protocol specification.

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::signal;
use tracing::info;

use crate::dispatch::Dispatcher;
use crate::error::{GatewayError, GatewayResult};
use crate::mcp::AttendanceService;
use crate::store::mysql::MySqlStore;

pub struct StdioTransport {
    dispatcher: Arc<Dispatcher<MySqlStore>>,
}

impl StdioTransport {
    pub fn new(dispatcher: Arc<Dispatcher<MySqlStore>>) -> Self {
        Self { dispatcher }
    }

    pub async fn run(&self) -> GatewayResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = AttendanceService::new(self.dispatcher.clone());
        let transport = stdio();
        let running_service = service.serve(transport).await.map_err(|e| {
            GatewayError::store(format!("Failed to start stdio transport: {}", e))
        })?;

        let shutdown_requested = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => {
                        info!("Stdio transport completed normally");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Stdio transport error");
                        return Err(GatewayError::store(format!(
                            "Stdio transport error: {}",
                            e
                        )));
                    }
                }
                false
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received (send again to force exit)");
                true
            }
        };

        if shutdown_requested {
            // Spawn a task to listen for second signal and force exit
            tokio::spawn(async {
                wait_for_signal().await;
                tracing::warn!("Received second signal, forcing immediate exit");
                std::process::exit(1);
            });
        }

        info!("Closing database connection pool");
        self.dispatcher.store().close().await;

        if shutdown_requested {
            // Force exit since stdio may still be blocking on stdin
            // tokio::select! cannot interrupt blocking stdin reads
            info!("Exiting process");
            std::process::exit(0);
        }

        Ok(())
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }
}
