//! Write guard for the free-form query tool.
//!
//! Classification is purely syntactic over the first keyword of the trimmed
//! statement. It is deliberately not a SQL parser: the guard only decides
//! whether a confirmation flag is required, the database itself remains the
//! authority on what the statement actually does.

use crate::error::{GatewayError, GatewayResult};

/// Coarse classification of a SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Known read form (SELECT, SHOW, DESCRIBE, EXPLAIN, WITH).
    Read,
    /// Known write form (INSERT, UPDATE, DELETE).
    Write,
    /// Anything else (DDL, unknown keywords, empty input).
    Other,
}

impl StatementKind {
    /// True when executing the statement requires confirm_write.
    pub fn requires_confirmation(self) -> bool {
        !matches!(self, StatementKind::Read)
    }
}

/// First keyword of the trimmed statement, uppercased, or empty.
pub fn leading_keyword(sql: &str) -> String {
    sql.split(|c: char| c.is_whitespace() || c == '(' || c == ';')
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_uppercase()
}

/// Classify a statement by its leading keyword.
pub fn classify(sql: &str) -> StatementKind {
    match leading_keyword(sql).as_str() {
        "INSERT" | "UPDATE" | "DELETE" => StatementKind::Write,
        "SELECT" | "SHOW" | "DESCRIBE" | "DESC" | "EXPLAIN" | "WITH" => StatementKind::Read,
        _ => StatementKind::Other,
    }
}

/// Reject non-read statements that arrive without confirmation.
pub fn ensure_confirmed(kind: StatementKind, confirm_write: bool) -> GatewayResult<()> {
    if kind.requires_confirmation() && !confirm_write {
        return Err(GatewayError::WriteNotConfirmed);
    }
    Ok(())
}
