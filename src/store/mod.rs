//! Store abstraction over the attendance database.
//!
//! Tool handlers are generic over [`Store`] so integration tests can drive
//! them with a scripted fake instead of a live MySQL server.

pub mod mysql;
pub mod rows;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::GatewayResult;

/// A decoded result row, column name to JSON value.
pub type Row = serde_json::Map<String, JsonValue>;

/// Typed bind parameter for parameterized statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Param {
    /// Convert a JSON value into the closest bind parameter.
    ///
    /// Decimal day counts that arrive as strings stay strings so MySQL
    /// coerces them without a float round-trip.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Param::Null,
            JsonValue::Bool(b) => Param::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Param::Int(i)
                } else {
                    Param::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            JsonValue::String(s) => Param::String(s.clone()),
            other => Param::String(other.to_string()),
        }
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::String(value.to_string())
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Int(value)
    }
}

/// Outcome of a write statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteSummary {
    pub rows_affected: u64,
    pub last_insert_id: Option<u64>,
}

/// Executes parameterized statements against the attendance database.
#[async_trait]
pub trait Store: Send + Sync {
    type Tx: StoreTransaction;

    /// Run a read statement and decode all rows.
    async fn fetch(&self, sql: &str, params: &[Param]) -> GatewayResult<Vec<Row>>;

    /// Run a write statement.
    async fn execute(&self, sql: &str, params: &[Param]) -> GatewayResult<WriteSummary>;

    /// Open a transaction.
    async fn begin(&self) -> GatewayResult<Self::Tx>;
}

/// A transaction scope. Dropping without commit rolls back.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn fetch(&mut self, sql: &str, params: &[Param]) -> GatewayResult<Vec<Row>>;

    async fn execute(&mut self, sql: &str, params: &[Param]) -> GatewayResult<WriteSummary>;

    async fn commit(self) -> GatewayResult<()>;

    async fn rollback(self) -> GatewayResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_from_json_scalars() {
        assert_eq!(Param::from_json(&json!(null)), Param::Null);
        assert_eq!(Param::from_json(&json!(true)), Param::Bool(true));
        assert_eq!(Param::from_json(&json!(42)), Param::Int(42));
        assert_eq!(Param::from_json(&json!(1.5)), Param::Float(1.5));
        assert_eq!(
            Param::from_json(&json!("E001")),
            Param::String("E001".to_string())
        );
    }

    #[test]
    fn test_param_from_json_keeps_decimal_strings() {
        // "0.50" must not become 0.5 via f64
        assert_eq!(
            Param::from_json(&json!("0.50")),
            Param::String("0.50".to_string())
        );
    }
}
