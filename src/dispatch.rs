//! Tool dispatcher: total conversion from a named call to an envelope.
//!
//! `dispatch` never returns an error. Catalog lookup, validation, handler
//! execution and formatting all funnel into one envelope so the MCP layer
//! stays a thin shell.

use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::{ArgMap, Catalog};
use crate::envelope::Envelope;
use crate::error::{GatewayError, GatewayResult};
use crate::store::Store;
use crate::tools::{employee, leave, query, schema};

pub struct Dispatcher<S: Store> {
    store: Arc<S>,
    catalog: Catalog,
    database: String,
}

impl<S: Store> Dispatcher<S> {
    pub fn new(store: Arc<S>, database: impl Into<String>) -> Self {
        Self {
            store,
            catalog: Catalog::new(),
            database: database.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one tool call. Every failure becomes an error envelope.
    pub async fn dispatch(&self, name: &str, args: &ArgMap) -> Envelope {
        info!(tool = %name, "Dispatching tool call");
        match self.run(name, args).await {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(tool = %name, kind = err.kind(), error = %err, "Tool call failed");
                Envelope::error(err)
            }
        }
    }

    async fn run(&self, name: &str, args: &ArgMap) -> GatewayResult<Envelope> {
        let tool = self
            .catalog
            .get(name)
            .ok_or_else(|| GatewayError::unknown_tool(name))?;
        let args = tool.validate_args(args)?;
        let store = self.store.as_ref();

        match tool.name {
            "get_tables_info" => schema::get_tables_info(store, &self.database).await,
            "get_table_structure" => {
                schema::get_table_structure(store, &self.database, &args).await
            }
            "query_database" => query::query_database(store, &args).await,
            "get_employee_info" => employee::get_employee_info(store, &args).await,
            "get_leave_balance" => leave::get_leave_balance(store, &args).await,
            "get_leave_requests" => leave::get_leave_requests(store, &args).await,
            "add_employee" => employee::add_employee(store, &args).await,
            "update_employee" => employee::update_employee(store, &args).await,
            "deactivate_employee" => employee::deactivate_employee(store, &args).await,
            "submit_leave_request" => leave::submit_leave_request(store, &args).await,
            "approve_leave_request" => leave::approve_leave_request(store, &args).await,
            "cancel_leave_request" => leave::cancel_leave_request(store, &args).await,
            "update_leave_balance" => leave::update_leave_balance(store, &args).await,
            other => Err(GatewayError::unknown_tool(other)),
        }
    }
}
