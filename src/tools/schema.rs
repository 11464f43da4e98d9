//! Schema inspection tools backed by information_schema.

use tracing::info;

use crate::catalog::ArgMap;
use crate::envelope::Envelope;
use crate::error::{GatewayError, GatewayResult};
use crate::store::{Param, Store};
use crate::tools::arg_str;

const TABLES_SQL: &str = "SELECT TABLE_NAME AS table_name, \
     TABLE_COMMENT AS table_comment, \
     TABLE_ROWS AS estimated_rows \
     FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE' \
     ORDER BY TABLE_NAME";

const COLUMNS_SQL: &str = "SELECT COLUMN_NAME AS column_name, \
     COLUMN_TYPE AS column_type, \
     IS_NULLABLE AS is_nullable, \
     COLUMN_KEY AS column_key, \
     COLUMN_DEFAULT AS column_default, \
     COLUMN_COMMENT AS column_comment \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

/// List all base tables of the configured database.
pub async fn get_tables_info<S: Store>(store: &S, database: &str) -> GatewayResult<Envelope> {
    let rows = store.fetch(TABLES_SQL, &[Param::from(database)]).await?;
    info!(tables = rows.len(), "Listed database tables");
    Ok(Envelope::rows("Database tables", &rows))
}

/// Describe one table's columns in ordinal order.
pub async fn get_table_structure<S: Store>(
    store: &S,
    database: &str,
    args: &ArgMap,
) -> GatewayResult<Envelope> {
    let table_name = arg_str(args, "table_name")?;
    let rows = store
        .fetch(COLUMNS_SQL, &[Param::from(database), Param::from(table_name)])
        .await?;
    if rows.is_empty() {
        return Err(GatewayError::row_not_found(format!(
            "Table '{}' not found",
            table_name
        )));
    }
    info!(table = %table_name, columns = rows.len(), "Described table");
    Ok(Envelope::rows(
        &format!("Structure of {}", table_name),
        &rows,
    ))
}
