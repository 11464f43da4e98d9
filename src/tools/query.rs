//! Free-form SQL tool with the write guard in front.
//!
//! Read statements run directly; write statements and anything the classifier
//! does not recognize require an explicit confirm_write flag.

use tracing::info;

use crate::catalog::ArgMap;
use crate::envelope::Envelope;
use crate::error::GatewayResult;
use crate::store::Store;
use crate::tools::guard::{self, StatementKind};
use crate::tools::{arg_bool, arg_str};

/// Execute a caller-supplied SQL statement.
pub async fn query_database<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let sql = arg_str(args, "sql")?;
    let confirm_write = arg_bool(args, "confirm_write");

    let kind = guard::classify(sql);
    guard::ensure_confirmed(kind, confirm_write)?;

    match kind {
        StatementKind::Read => {
            let rows = store.fetch(sql, &[]).await?;
            info!(rows = rows.len(), "Executed read statement");
            Ok(Envelope::rows("Query result", &rows))
        }
        StatementKind::Write | StatementKind::Other => {
            let keyword = guard::leading_keyword(sql);
            let summary = store.execute(sql, &[]).await?;
            info!(
                keyword = %keyword,
                rows_affected = summary.rows_affected,
                "Executed confirmed write statement"
            );
            Ok(Envelope::mutation(
                "Statement executed",
                &summary,
                &format!("Successfully executed {} operation", keyword),
            ))
        }
    }
}
