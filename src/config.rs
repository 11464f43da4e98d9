//! Configuration handling for the attendance MCP server.
//!
//! Connection settings come from CLI arguments or environment variables, with
//! defaults matching the standard attendance_system deployment.

use clap::Parser;
use sqlx::mysql::MySqlConnectOptions;
use std::time::Duration;

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_USER: &str = "admin";
pub const DEFAULT_DB_PASSWORD: &str = "admin123";
pub const DEFAULT_DB_NAME: &str = "attendance_system";
pub const DEFAULT_DB_CHARSET: &str = "utf8mb4";

// Pool configuration defaults
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// Server configuration parsed from CLI arguments and environment.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "attendance-mcp-server",
    about = "MCP server exposing an attendance database as callable tools",
    version,
    author
)]
pub struct Config {
    /// Database server hostname
    #[arg(long, default_value = DEFAULT_DB_HOST, env = "DB_HOST")]
    pub db_host: String,

    /// Database server port
    #[arg(long, default_value_t = DEFAULT_DB_PORT, env = "DB_PORT")]
    pub db_port: u16,

    /// Database user
    #[arg(long, default_value = DEFAULT_DB_USER, env = "DB_USER")]
    pub db_user: String,

    /// Database password (sensitive - not logged)
    #[arg(
        long,
        default_value = DEFAULT_DB_PASSWORD,
        env = "DB_PASSWORD",
        hide_env_values = true
    )]
    pub db_password: String,

    /// Database name
    #[arg(long, default_value = DEFAULT_DB_NAME, env = "DB_NAME")]
    pub db_name: String,

    /// Connection character set
    #[arg(long, default_value = DEFAULT_DB_CHARSET, env = "DB_CHARSET")]
    pub db_charset: String,

    /// Maximum connections in the pool
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_CONNECTIONS,
        env = "MCP_MAX_CONNECTIONS"
    )]
    pub max_connections: u32,

    /// Minimum connections kept alive in the pool
    #[arg(
        long,
        default_value_t = DEFAULT_MIN_CONNECTIONS,
        env = "MCP_MIN_CONNECTIONS"
    )]
    pub min_connections: u32,

    /// Pool acquire timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_ACQUIRE_TIMEOUT_SECS,
        env = "MCP_ACQUIRE_TIMEOUT"
    )]
    pub acquire_timeout: u64,

    /// Idle connection timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_IDLE_TIMEOUT_SECS,
        env = "MCP_IDLE_TIMEOUT"
    )]
    pub idle_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output (disabled by default to avoid interfering with stdio transport)
    #[arg(long, env = "MCP_ENABLE_LOGS")]
    pub enable_logs: bool,
}

impl Config {
    /// Build sqlx connection options from the configured settings.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
            .charset(&self.db_charset)
    }

    pub fn acquire_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout)
    }

    pub fn idle_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.idle_timeout)
    }

    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.db_host.is_empty() {
            return Err("db_host must not be empty".to_string());
        }
        if self.db_user.is_empty() {
            return Err("db_user must not be empty".to_string());
        }
        if self.db_name.is_empty() {
            return Err("db_name must not be empty".to_string());
        }
        if self.max_connections == 0 {
            return Err("max_connections must be greater than 0".to_string());
        }
        if self.min_connections > self.max_connections {
            return Err(format!(
                "min_connections ({}) cannot exceed max_connections ({})",
                self.min_connections, self.max_connections
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config::parse_from(["attendance-mcp-server"])
    }

    #[test]
    fn test_defaults_match_standard_deployment() {
        let config = base_config();
        assert_eq!(config.db_host, "localhost");
        assert_eq!(config.db_port, 3306);
        assert_eq!(config.db_user, "admin");
        assert_eq!(config.db_name, "attendance_system");
        assert_eq!(config.db_charset, "utf8mb4");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::parse_from([
            "attendance-mcp-server",
            "--db-host",
            "db.internal",
            "--db-port",
            "3307",
            "--db-name",
            "attendance_staging",
        ]);
        assert_eq!(config.db_host, "db.internal");
        assert_eq!(config.db_port, 3307);
        assert_eq!(config.db_name, "attendance_staging");
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_db_name() {
        let mut config = base_config();
        config.db_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_pool_bounds() {
        let mut config = base_config();
        config.min_connections = 20;
        config.max_connections = 5;
        let err = config.validate().unwrap_err();
        assert!(err.contains("min_connections"));
    }

    #[test]
    fn test_timeout_durations() {
        let config = base_config();
        assert_eq!(
            config.acquire_timeout_duration(),
            Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS)
        );
        assert_eq!(
            config.idle_timeout_duration(),
            Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS)
        );
    }
}
