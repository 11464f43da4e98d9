//! Result envelope formatting.
//!
//! Every tool call, success or failure, produces exactly one text envelope.
//! Successes carry a short label and pretty-printed JSON; failures carry the
//! `Error: ` prefix with the error's display message. The MCP call itself
//! always succeeds so clients read the outcome from the text.

use serde_json::{Value as JsonValue, json};

use crate::store::{Row, WriteSummary};

/// Formatted outcome of one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    text: String,
}

impl Envelope {
    /// Success envelope around a row set.
    pub fn rows(label: &str, rows: &[Row]) -> Self {
        let values: Vec<JsonValue> = rows.iter().map(|r| JsonValue::Object(r.clone())).collect();
        Self::payload(label, &JsonValue::Array(values))
    }

    /// Success envelope around an arbitrary JSON payload.
    pub fn payload(label: &str, value: &JsonValue) -> Self {
        let pretty = serde_json::to_string_pretty(value)
            .unwrap_or_else(|_| "null".to_string());
        Self {
            text: format!("{}:\n{}", label, pretty),
        }
    }

    /// Success envelope around a write outcome.
    pub fn mutation(label: &str, summary: &WriteSummary, message: &str) -> Self {
        Self::payload(
            label,
            &json!({
                "affectedRows": summary.rows_affected,
                "insertedId": summary.last_insert_id,
                "message": message,
            }),
        )
    }

    /// Failure envelope. The message is the error's display form.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            text: format!("Error: {}", message),
        }
    }

    pub fn is_error(&self) -> bool {
        self.text.starts_with("Error: ")
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
