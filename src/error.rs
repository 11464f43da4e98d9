//! Error types for the attendance MCP server.
//!
//! Every tool failure is expressed as a `GatewayError` and ultimately rendered
//! through the result envelope, so callers always receive a readable message
//! instead of a protocol-level fault.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Missing required argument: {name}")]
    MissingArgument { name: &'static str },

    #[error("Invalid value {value} for argument '{argument}': expected {expected}")]
    InvalidType {
        argument: &'static str,
        /// Rendered JSON form of the offending value.
        value: String,
        expected: &'static str,
    },

    #[error("Invalid value '{value}' for argument '{argument}' (allowed: {allowed})")]
    InvalidEnum {
        argument: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Write operation detected. Set confirm_write to true to execute it")]
    WriteNotConfirmed,

    #[error("Unknown leave type code: {code}")]
    InvalidLeaveTypeCode { code: String },

    #[error("{message}")]
    RowNotFound { message: String },

    #[error("No updatable fields were provided")]
    NothingToUpdate,

    #[error("Database error: {message}")]
    Store { message: String },
}

impl GatewayError {
    /// Create an unknown tool error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    /// Create an invalid leave type code error.
    pub fn invalid_leave_type(code: impl Into<String>) -> Self {
        Self::InvalidLeaveTypeCode { code: code.into() }
    }

    /// Create a row-not-found error with a caller-facing message.
    pub fn row_not_found(message: impl Into<String>) -> Self {
        Self::RowNotFound {
            message: message.into(),
        }
    }

    /// Create a store error wrapping a driver-level failure.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Stable kind label used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool { .. } => "unknown_tool",
            Self::MissingArgument { .. } => "missing_argument",
            Self::InvalidType { .. } => "invalid_type",
            Self::InvalidEnum { .. } => "invalid_enum",
            Self::WriteNotConfirmed => "write_not_confirmed",
            Self::InvalidLeaveTypeCode { .. } => "invalid_leave_type_code",
            Self::RowNotFound { .. } => "row_not_found",
            Self::NothingToUpdate => "nothing_to_update",
            Self::Store { .. } => "store",
        }
    }
}

/// Convert sqlx errors to GatewayError.
impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => {
                GatewayError::store(format!("configuration error: {}", msg))
            }
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) => {
                    GatewayError::store(format!("{} (SQLSTATE: {})", db_err.message(), code))
                }
                None => GatewayError::store(db_err.message().to_string()),
            },
            sqlx::Error::RowNotFound => GatewayError::row_not_found("No rows returned"),
            sqlx::Error::PoolTimedOut => {
                GatewayError::store("timed out acquiring a connection from the pool")
            }
            sqlx::Error::PoolClosed => GatewayError::store("connection pool is closed"),
            sqlx::Error::Io(io_err) => GatewayError::store(format!("I/O error: {}", io_err)),
            sqlx::Error::Protocol(msg) => {
                GatewayError::store(format!("protocol error: {}", msg))
            }
            sqlx::Error::ColumnNotFound(col) => {
                GatewayError::store(format!("column not found: {}", col))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                GatewayError::store(format!("failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                GatewayError::store(format!("decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => GatewayError::store("database worker crashed"),
            other => GatewayError::store(other.to_string()),
        }
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
