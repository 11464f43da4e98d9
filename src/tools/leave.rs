//! Leave request tools: balances, requests, the approval workflow.
//!
//! Approval is the one multi-statement operation in the server and runs in a
//! single transaction: the status flip and the balance increment land
//! together or not at all.

use chrono::{Datelike, NaiveDate};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::catalog::ArgMap;
use crate::envelope::Envelope;
use crate::error::{GatewayError, GatewayResult};
use crate::store::{Param, Store, StoreTransaction};
use crate::tools::fields::FieldSet;
use crate::tools::{arg_i64, arg_str, opt_param, opt_str};

const BALANCE_SQL: &str = "SELECT elb.employee_id, e.employee_name, \
     lt.leave_type_code, lt.leave_type_name, elb.year, \
     elb.total_days, elb.used_days, \
     elb.total_days - elb.used_days AS remaining_days \
     FROM employee_leave_balances elb \
     JOIN employees e ON elb.employee_id = e.employee_id \
     JOIN leave_types lt ON elb.leave_type_id = lt.leave_type_id \
     WHERE elb.employee_id = ? AND elb.year = ? \
     ORDER BY lt.leave_type_code";

const REQUESTS_SQL: &str = "SELECT lr.request_id, lr.employee_id, e.employee_name, \
     lt.leave_type_code, lt.leave_type_name, \
     lr.start_date, lr.end_date, lr.days_requested, lr.reason, lr.status, \
     lr.approved_by, a.employee_name AS approver_name, \
     lr.approved_at, lr.created_at \
     FROM leave_requests lr \
     JOIN employees e ON lr.employee_id = e.employee_id \
     JOIN leave_types lt ON lr.leave_type_id = lt.leave_type_id \
     LEFT JOIN employees a ON lr.approved_by = a.employee_id";

const APPROVE_SQL: &str = "UPDATE leave_requests \
     SET status = ?, approved_by = ?, approved_at = NOW() \
     WHERE request_id = ? AND status = 'pending'";

const APPROVED_REQUEST_SQL: &str = "SELECT employee_id, leave_type_id, days_requested, start_date \
     FROM leave_requests WHERE request_id = ?";

const INCREMENT_USED_SQL: &str = "UPDATE employee_leave_balances \
     SET used_days = used_days + ? \
     WHERE employee_id = ? AND leave_type_id = ? AND year = ?";

/// Resolve a leave type code to its id. Unknown codes fail before any write.
async fn resolve_leave_type<S: Store>(store: &S, code: &str) -> GatewayResult<i64> {
    let rows = store
        .fetch(
            "SELECT leave_type_id FROM leave_types WHERE leave_type_code = ?",
            &[Param::from(code)],
        )
        .await?;
    rows.first()
        .and_then(|row| row.get("leave_type_id"))
        .and_then(JsonValue::as_i64)
        .ok_or_else(|| GatewayError::invalid_leave_type(code))
}

/// Calendar year of a date rendered as `YYYY-MM-DD`.
fn year_of(value: &JsonValue) -> GatewayResult<i64> {
    let text = value
        .as_str()
        .ok_or_else(|| GatewayError::store("leave request start_date is not a date string"))?;
    let date = NaiveDate::parse_from_str(text.get(..10).unwrap_or(text), "%Y-%m-%d")
        .map_err(|e| GatewayError::store(format!("invalid start_date '{}': {}", text, e)))?;
    Ok(i64::from(date.year()))
}

/// Fetch an employee's leave balances for one year.
pub async fn get_leave_balance<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let employee_id = arg_str(args, "employee_id")?;
    let year = arg_i64(args, "year")?;

    let rows = store
        .fetch(BALANCE_SQL, &[Param::from(employee_id), Param::Int(year)])
        .await?;
    info!(employee_id = %employee_id, year, balances = rows.len(), "Fetched leave balances");
    Ok(Envelope::rows("Leave balances", &rows))
}

/// List leave requests, optionally filtered, newest first.
pub async fn get_leave_requests<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let mut sql = format!("{} WHERE 1=1", REQUESTS_SQL);
    let mut params = Vec::new();

    if let Some(employee_id) = opt_str(args, "employee_id") {
        sql.push_str(" AND lr.employee_id = ?");
        params.push(Param::from(employee_id));
    }
    if let Some(status) = opt_str(args, "status") {
        sql.push_str(" AND lr.status = ?");
        params.push(Param::from(status));
    }
    if let Some(start_date) = opt_str(args, "start_date") {
        sql.push_str(" AND lr.start_date >= ?");
        params.push(Param::from(start_date));
    }
    if let Some(end_date) = opt_str(args, "end_date") {
        sql.push_str(" AND lr.end_date <= ?");
        params.push(Param::from(end_date));
    }
    sql.push_str(" ORDER BY lr.created_at DESC");

    let rows = store.fetch(&sql, &params).await?;
    info!(requests = rows.len(), "Fetched leave requests");
    Ok(Envelope::rows("Leave requests", &rows))
}

/// Insert a new leave request in 'pending' status.
pub async fn submit_leave_request<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let employee_id = arg_str(args, "employee_id")?;
    let code = arg_str(args, "leave_type_code")?;
    let leave_type_id = resolve_leave_type(store, code).await?;

    let summary = store
        .execute(
            "INSERT INTO leave_requests \
             (employee_id, leave_type_id, start_date, end_date, days_requested, reason, status) \
             VALUES (?, ?, ?, ?, ?, ?, 'pending')",
            &[
                Param::from(employee_id),
                Param::Int(leave_type_id),
                Param::from(arg_str(args, "start_date")?),
                Param::from(arg_str(args, "end_date")?),
                crate::tools::arg_param(args, "days_requested")?,
                opt_param(args, "reason"),
            ],
        )
        .await?;

    info!(
        employee_id = %employee_id,
        leave_type = %code,
        request_id = ?summary.last_insert_id,
        "Submitted leave request"
    );
    Ok(Envelope::mutation(
        "Leave request submitted",
        &summary,
        &format!("Leave request for {} submitted, pending approval", employee_id),
    ))
}

/// Approve or reject a pending request in one transaction.
///
/// Rejection only flips the status. Approval additionally books the requested
/// days against the balance row for the start date's calendar year. A missing
/// balance row leaves the increment affecting zero rows, which is still a
/// successful approval.
pub async fn approve_leave_request<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let request_id = arg_i64(args, "request_id")?;
    let action = arg_str(args, "action")?;
    let approved_by = arg_str(args, "approved_by")?;

    let mut tx = store.begin().await?;
    match approve_in_tx(&mut tx, request_id, action, approved_by).await {
        Ok(envelope) => {
            tx.commit().await?;
            info!(request_id, action = %action, approver = %approved_by, "Processed leave request");
            Ok(envelope)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(request_id, error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

async fn approve_in_tx<Tx: StoreTransaction>(
    tx: &mut Tx,
    request_id: i64,
    action: &str,
    approved_by: &str,
) -> GatewayResult<Envelope> {
    let summary = tx
        .execute(
            APPROVE_SQL,
            &[
                Param::from(action),
                Param::from(approved_by),
                Param::Int(request_id),
            ],
        )
        .await?;

    if summary.rows_affected == 0 {
        return Err(GatewayError::row_not_found(format!(
            "No pending leave request found with id {}",
            request_id
        )));
    }

    if action == "approved" {
        let rows = tx
            .fetch(APPROVED_REQUEST_SQL, &[Param::Int(request_id)])
            .await?;
        if let Some(request) = rows.first() {
            let year = year_of(request.get("start_date").unwrap_or(&JsonValue::Null))?;
            let days = request.get("days_requested").unwrap_or(&JsonValue::Null);
            tx.execute(
                INCREMENT_USED_SQL,
                &[
                    Param::from_json(days),
                    Param::from_json(request.get("employee_id").unwrap_or(&JsonValue::Null)),
                    Param::from_json(request.get("leave_type_id").unwrap_or(&JsonValue::Null)),
                    Param::Int(year),
                ],
            )
            .await?;
        }
    }

    Ok(Envelope::mutation(
        "Leave request processed",
        &summary,
        &format!("Leave request {} {}", request_id, action),
    ))
}

/// Cancel a pending or approved request.
pub async fn cancel_leave_request<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let request_id = arg_i64(args, "request_id")?;

    let summary = store
        .execute(
            "UPDATE leave_requests SET status = 'cancelled' \
             WHERE request_id = ? AND status IN ('pending', 'approved')",
            &[Param::Int(request_id)],
        )
        .await?;

    if summary.rows_affected == 0 {
        return Err(GatewayError::row_not_found(format!(
            "No cancellable leave request found with id {}",
            request_id
        )));
    }

    info!(request_id, "Cancelled leave request");
    Ok(Envelope::mutation(
        "Leave request cancelled",
        &summary,
        &format!("Leave request {} cancelled", request_id),
    ))
}

/// Upsert an employee's balance row for one (leave type, year).
pub async fn update_leave_balance<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let employee_id = arg_str(args, "employee_id")?;
    let code = arg_str(args, "leave_type_code")?;
    let year = arg_i64(args, "year")?;
    let leave_type_id = resolve_leave_type(store, code).await?;

    let existing = store
        .fetch(
            "SELECT balance_id FROM employee_leave_balances \
             WHERE employee_id = ? AND leave_type_id = ? AND year = ?",
            &[
                Param::from(employee_id),
                Param::Int(leave_type_id),
                Param::Int(year),
            ],
        )
        .await?;

    let summary = if existing.is_empty() {
        let total_days = opt_param(args, "total_days");
        let used_days = opt_param(args, "used_days");
        let summary = store
            .execute(
                "INSERT INTO employee_leave_balances \
                 (employee_id, leave_type_id, year, total_days, used_days) \
                 VALUES (?, ?, ?, COALESCE(?, 0), COALESCE(?, 0))",
                &[
                    Param::from(employee_id),
                    Param::Int(leave_type_id),
                    Param::Int(year),
                    total_days,
                    used_days,
                ],
            )
            .await?;
        info!(employee_id = %employee_id, leave_type = %code, year, "Created leave balance");
        summary
    } else {
        let set = FieldSet::collect(
            args,
            &[("total_days", "total_days"), ("used_days", "used_days")],
        );
        set.ensure_nonempty()?;
        let sql = format!(
            "UPDATE employee_leave_balances SET {} \
             WHERE employee_id = ? AND leave_type_id = ? AND year = ?",
            set.set_clause()
        );
        let params = set.into_params([
            Param::from(employee_id),
            Param::Int(leave_type_id),
            Param::Int(year),
        ]);
        let summary = store.execute(&sql, &params).await?;
        info!(employee_id = %employee_id, leave_type = %code, year, "Updated leave balance");
        summary
    };

    Ok(Envelope::mutation(
        "Leave balance saved",
        &summary,
        &format!("Leave balance for {} ({}, {}) saved", employee_id, code, year),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_year_of_plain_date() {
        assert_eq!(year_of(&json!("2024-03-11")).unwrap(), 2024);
    }

    #[test]
    fn test_year_of_datetime_string() {
        assert_eq!(year_of(&json!("2025-12-31 08:00:00")).unwrap(), 2025);
    }

    #[test]
    fn test_year_of_rejects_non_strings() {
        assert!(year_of(&json!(20240311)).is_err());
        assert!(year_of(&json!("not-a-date")).is_err());
    }
}
