//! Sparse UPDATE construction from fixed field lists.
//!
//! Callers enumerate the allowed (argument, column) pairs at the call site,
//! so SQL text is only ever assembled from compile-time column names.

use serde_json::Value as JsonValue;

use crate::catalog::ArgMap;
use crate::error::{GatewayError, GatewayResult};
use crate::store::Param;

/// Collected assignments for one UPDATE statement.
#[derive(Debug, Clone)]
pub struct FieldSet {
    columns: Vec<&'static str>,
    params: Vec<Param>,
}

/// An argument participates when it is present, non-null and, for strings,
/// non-empty. Zero is a value.
fn is_present(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl FieldSet {
    /// Collect assignments from the supplied arguments, restricted to the
    /// fixed (argument name, column name) pairs.
    pub fn collect(args: &ArgMap, allowed: &[(&'static str, &'static str)]) -> Self {
        let mut columns = Vec::new();
        let mut params = Vec::new();
        for (arg_name, column) in allowed {
            if let Some(value) = args.get(*arg_name) {
                if is_present(value) {
                    columns.push(*column);
                    params.push(Param::from_json(value));
                }
            }
        }
        Self { columns, params }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Fail with NothingToUpdate when no field was supplied.
    pub fn ensure_nonempty(&self) -> GatewayResult<()> {
        if self.is_empty() {
            return Err(GatewayError::NothingToUpdate);
        }
        Ok(())
    }

    /// Render the `SET` clause: `col1 = ?, col2 = ?`.
    pub fn set_clause(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{} = ?", c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Assignment parameters followed by the given key parameters, in bind
    /// order for the rendered statement.
    pub fn into_params(self, keys: impl IntoIterator<Item = Param>) -> Vec<Param> {
        let mut params = self.params;
        params.extend(keys);
        params
    }
}
