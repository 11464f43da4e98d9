//! MCP tool implementations.
//!
//! This module contains the handlers behind the attendance tools:
//! - `schema`: table listing and table structure inspection
//! - `query`: guarded free-form SQL execution
//! - `employee`: employee lookup and maintenance
//! - `leave`: leave requests, approval workflow and balances
//! - `guard`: read/write classification for free-form SQL
//! - `fields`: sparse UPDATE construction from fixed field lists

pub mod employee;
pub mod fields;
pub mod guard;
pub mod leave;
pub mod query;
pub mod schema;

use serde_json::Value as JsonValue;

use crate::catalog::ArgMap;
use crate::error::{GatewayError, GatewayResult};
use crate::store::Param;

/// Required string argument. Catalog validation runs first, so a miss here is
/// a type mismatch rather than a truly absent argument.
pub(crate) fn arg_str<'a>(args: &'a ArgMap, name: &'static str) -> GatewayResult<&'a str> {
    args.get(name)
        .and_then(JsonValue::as_str)
        .ok_or(GatewayError::MissingArgument { name })
}

/// Optional string argument; empty strings count as absent.
pub(crate) fn opt_str<'a>(args: &'a ArgMap, name: &str) -> Option<&'a str> {
    args.get(name)
        .and_then(JsonValue::as_str)
        .filter(|s| !s.is_empty())
}

/// Required integer argument.
pub(crate) fn arg_i64(args: &ArgMap, name: &'static str) -> GatewayResult<i64> {
    args.get(name)
        .and_then(JsonValue::as_i64)
        .ok_or(GatewayError::MissingArgument { name })
}

/// Boolean argument, absent means false.
pub(crate) fn arg_bool(args: &ArgMap, name: &str) -> bool {
    args.get(name).and_then(JsonValue::as_bool).unwrap_or(false)
}

/// Required argument converted to a bind parameter.
pub(crate) fn arg_param(args: &ArgMap, name: &'static str) -> GatewayResult<Param> {
    match args.get(name) {
        Some(value) if !value.is_null() => Ok(Param::from_json(value)),
        _ => Err(GatewayError::MissingArgument { name }),
    }
}

/// Optional argument converted to a bind parameter, NULL when absent.
pub(crate) fn opt_param(args: &ArgMap, name: &str) -> Param {
    match args.get(name) {
        Some(value) => Param::from_json(value),
        None => Param::Null,
    }
}
