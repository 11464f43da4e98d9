//! Attendance MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to work with an attendance database: employees, leave requests and
//! per-year leave balances.

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod mcp;
pub mod store;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::GatewayError;
pub use mcp::AttendanceService;
