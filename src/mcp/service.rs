//! MCP service implementation using rmcp.
//!
//! The handler is deliberately thin: `list_tools` renders the statement
//! catalog and `call_tool` hands the request to the dispatcher. Tool failures
//! surface inside the result envelope, so the MCP call itself only errors on
//! protocol-level problems.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
};

use crate::catalog::Catalog;
use crate::dispatch::Dispatcher;
use crate::store::Store;

/// Render the statement catalog as MCP tool declarations.
fn catalog_tools(catalog: &Catalog) -> Vec<Tool> {
    catalog
        .tools()
        .iter()
        .map(|tool| Tool::new(tool.name, tool.description, tool.input_schema()))
        .collect()
}

pub struct AttendanceService<S: Store> {
    dispatcher: Arc<Dispatcher<S>>,
}

impl<S: Store> Clone for AttendanceService<S> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<S: Store + 'static> AttendanceService<S> {
    pub fn new(dispatcher: Arc<Dispatcher<S>>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher<S> {
        &self.dispatcher
    }
}

impl<S: Store + 'static> ServerHandler for AttendanceService<S> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "attendance-mcp-server".to_owned(),
                title: Some("Attendance MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for the attendance database: employees, leave types, \
                leave requests and per-year leave balances.\n\
                \n\
                ## Workflow\n\
                1. `get_tables_info` / `get_table_structure` to inspect the schema\n\
                2. Dedicated tools (`get_employee_info`, `get_leave_balance`, \
                `submit_leave_request`, ...) for common operations\n\
                3. `query_database` for anything else; write statements require \
                `confirm_write: true`\n\
                \n\
                ## Leave workflow\n\
                `submit_leave_request` creates a pending request. \
                `approve_leave_request` approves or rejects it; approval books \
                the days against the employee's balance for the start date's year. \
                `cancel_leave_request` cancels pending or approved requests.\n\
                \n\
                Tool failures are reported as text starting with `Error: `."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: catalog_tools(self.dispatcher.catalog()),
            next_cursor: None,
            meta: Default::default(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request.arguments.unwrap_or_default();
        let envelope = self.dispatcher.dispatch(&request.name, &args).await;
        Ok(CallToolResult::success(vec![Content::text(
            envelope.into_text(),
        )]))
    }
}
