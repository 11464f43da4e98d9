//! Leave workflow tests: submission, transactional approval and balances.

mod common;

use std::sync::Arc;

use serde_json::json;

use attendance_mcp_server::catalog::ArgMap;
use attendance_mcp_server::dispatch::Dispatcher;
use attendance_mcp_server::store::Param;
use common::{FakeStore, row};

fn dispatcher(store: &FakeStore) -> Dispatcher<FakeStore> {
    Dispatcher::new(Arc::new(store.clone()), "attendance_system")
}

fn args(value: serde_json::Value) -> ArgMap {
    value.as_object().cloned().unwrap_or_default()
}

fn approve_args(request_id: i64, action: &str) -> ArgMap {
    args(json!({
        "request_id": request_id,
        "action": action,
        "approved_by": "M001"
    }))
}

#[tokio::test]
async fn submit_with_unknown_code_fails_before_insert() {
    let store = FakeStore::new().with_rows(vec![]);
    let envelope = dispatcher(&store)
        .dispatch(
            "submit_leave_request",
            &args(json!({
                "employee_id": "E001",
                "leave_type_code": "SABBATICAL",
                "start_date": "2024-03-11",
                "end_date": "2024-03-12",
                "days_requested": 2
            })),
        )
        .await;

    assert_eq!(envelope.text(), "Error: Unknown leave type code: SABBATICAL");
    // Only the code lookup ran
    assert_eq!(store.statements().len(), 1);
    assert!(store.statements()[0].contains("FROM leave_types"));
}

#[tokio::test]
async fn submit_inserts_pending_request() {
    let store = FakeStore::new()
        .with_rows(vec![row(&[("leave_type_id", json!(2))])])
        .with_write(1, Some(17));
    let envelope = dispatcher(&store)
        .dispatch(
            "submit_leave_request",
            &args(json!({
                "employee_id": "E001",
                "leave_type_code": "ANNUAL",
                "start_date": "2024-03-11",
                "end_date": "2024-03-12",
                "days_requested": 1.5
            })),
        )
        .await;

    assert!(envelope.text().starts_with("Leave request submitted:\n"));
    assert!(envelope.text().contains("\"insertedId\": 17"));
    let insert = &store.statements()[1];
    assert!(insert.contains("INSERT INTO leave_requests"));
    assert!(insert.contains("'pending'"));
    assert_eq!(
        store.params_at(1),
        vec![
            Param::String("E001".to_string()),
            Param::Int(2),
            Param::String("2024-03-11".to_string()),
            Param::String("2024-03-12".to_string()),
            Param::Float(1.5),
            Param::Null,
        ]
    );
}

#[tokio::test]
async fn approval_books_days_for_start_date_year_and_commits() {
    let store = FakeStore::new()
        .with_write(1, None) // status flip
        .with_rows(vec![row(&[
            ("employee_id", json!("E001")),
            ("leave_type_id", json!(2)),
            ("days_requested", json!("1.50")),
            ("start_date", json!("2025-03-11")),
        ])])
        .with_write(1, None); // balance increment
    let envelope = dispatcher(&store)
        .dispatch("approve_leave_request", &approve_args(7, "approved"))
        .await;

    assert!(envelope.text().contains("Leave request 7 approved"));
    let statements = store.statements();
    assert_eq!(statements[0], "BEGIN");
    assert!(statements[1].contains("SET status = ?, approved_by = ?, approved_at = NOW()"));
    assert!(statements[1].contains("status = 'pending'"));
    assert!(statements[2].contains("FROM leave_requests WHERE request_id = ?"));
    assert!(statements[3].contains("SET used_days = used_days + ?"));
    assert_eq!(statements[4], "COMMIT");

    // Decimal day count binds as its exact string, year comes from start_date
    assert_eq!(
        store.params_at(3),
        vec![
            Param::String("1.50".to_string()),
            Param::String("E001".to_string()),
            Param::Int(2),
            Param::Int(2025),
        ]
    );
}

#[tokio::test]
async fn rejection_skips_the_balance_update() {
    let store = FakeStore::new().with_write(1, None);
    let envelope = dispatcher(&store)
        .dispatch("approve_leave_request", &approve_args(7, "rejected"))
        .await;

    assert!(envelope.text().contains("Leave request 7 rejected"));
    let statements = store.statements();
    assert_eq!(statements.len(), 3);
    assert_eq!(statements[0], "BEGIN");
    assert_eq!(statements[2], "COMMIT");
    assert_eq!(
        store.params_at(1),
        vec![
            Param::String("rejected".to_string()),
            Param::String("M001".to_string()),
            Param::Int(7),
        ]
    );
}

#[tokio::test]
async fn approving_a_non_pending_request_rolls_back() {
    let store = FakeStore::new().with_write(0, None);
    let envelope = dispatcher(&store)
        .dispatch("approve_leave_request", &approve_args(7, "approved"))
        .await;

    assert_eq!(
        envelope.text(),
        "Error: No pending leave request found with id 7"
    );
    let statements = store.statements();
    assert_eq!(statements.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(statements.last().map(String::as_str), Some("ROLLBACK"));
    assert!(!statements.iter().any(|s| s == "COMMIT"));
}

#[tokio::test]
async fn missing_balance_row_still_counts_as_successful_approval() {
    // The increment matches zero rows when no balance row exists for the
    // (employee, type, year); the approval must still commit.
    let store = FakeStore::new()
        .with_write(1, None)
        .with_rows(vec![row(&[
            ("employee_id", json!("E001")),
            ("leave_type_id", json!(2)),
            ("days_requested", json!("3.00")),
            ("start_date", json!("2024-07-01")),
        ])])
        .with_write(0, None);
    let envelope = dispatcher(&store)
        .dispatch("approve_leave_request", &approve_args(8, "approved"))
        .await;

    assert!(!envelope.is_error());
    assert!(envelope.text().contains("Leave request 8 approved"));
    assert_eq!(store.statements().last().map(String::as_str), Some("COMMIT"));
}

#[tokio::test]
async fn balance_update_failure_rolls_the_whole_approval_back() {
    let store = FakeStore::new()
        .with_write(1, None)
        .with_rows(vec![row(&[
            ("employee_id", json!("E001")),
            ("leave_type_id", json!(2)),
            ("days_requested", json!("1.00")),
            ("start_date", json!("2024-07-01")),
        ])])
        .with_failure("deadlock detected");
    let envelope = dispatcher(&store)
        .dispatch("approve_leave_request", &approve_args(9, "approved"))
        .await;

    assert_eq!(envelope.text(), "Error: Database error: deadlock detected");
    assert_eq!(store.statements().last().map(String::as_str), Some("ROLLBACK"));
}

#[tokio::test]
async fn cancel_flips_pending_or_approved_requests() {
    let store = FakeStore::new().with_write(1, None);
    let envelope = dispatcher(&store)
        .dispatch("cancel_leave_request", &args(json!({ "request_id": 5 })))
        .await;

    assert!(envelope.text().contains("Leave request 5 cancelled"));
    assert!(store.statements()[0].contains("status IN ('pending', 'approved')"));
    assert_eq!(store.params_at(0), vec![Param::Int(5)]);
}

#[tokio::test]
async fn cancel_of_finished_request_is_row_not_found() {
    let store = FakeStore::new().with_write(0, None);
    let envelope = dispatcher(&store)
        .dispatch("cancel_leave_request", &args(json!({ "request_id": 9 })))
        .await;

    assert_eq!(
        envelope.text(),
        "Error: No cancellable leave request found with id 9"
    );
}

#[tokio::test]
async fn balance_update_patches_existing_row() {
    let store = FakeStore::new()
        .with_rows(vec![row(&[("leave_type_id", json!(2))])])
        .with_rows(vec![row(&[("balance_id", json!(5))])])
        .with_write(1, None);
    let envelope = dispatcher(&store)
        .dispatch(
            "update_leave_balance",
            &args(json!({
                "employee_id": "E001",
                "leave_type_code": "ANNUAL",
                "year": 2024,
                "used_days": 0
            })),
        )
        .await;

    assert!(!envelope.is_error());
    let update = &store.statements()[2];
    assert!(update.contains("SET used_days = ?"));
    assert!(!update.contains("total_days"));
    assert_eq!(
        store.params_at(2),
        vec![
            Param::Int(0),
            Param::String("E001".to_string()),
            Param::Int(2),
            Param::Int(2024),
        ]
    );
}

#[tokio::test]
async fn balance_update_with_no_fields_on_existing_row_fails() {
    let store = FakeStore::new()
        .with_rows(vec![row(&[("leave_type_id", json!(2))])])
        .with_rows(vec![row(&[("balance_id", json!(5))])]);
    let envelope = dispatcher(&store)
        .dispatch(
            "update_leave_balance",
            &args(json!({
                "employee_id": "E001",
                "leave_type_code": "ANNUAL",
                "year": 2024
            })),
        )
        .await;

    assert_eq!(envelope.text(), "Error: No updatable fields were provided");
    // Resolution and probe ran, nothing was written
    assert_eq!(store.statements().len(), 2);
}

#[tokio::test]
async fn balance_update_creates_missing_row_with_defaults() {
    let store = FakeStore::new()
        .with_rows(vec![row(&[("leave_type_id", json!(2))])])
        .with_rows(vec![])
        .with_write(1, Some(31));
    let envelope = dispatcher(&store)
        .dispatch(
            "update_leave_balance",
            &args(json!({
                "employee_id": "E002",
                "leave_type_code": "ANNUAL",
                "year": 2024,
                "total_days": 14
            })),
        )
        .await;

    assert!(!envelope.is_error());
    let insert = &store.statements()[2];
    assert!(insert.contains("INSERT INTO employee_leave_balances"));
    assert_eq!(
        store.params_at(2),
        vec![
            Param::String("E002".to_string()),
            Param::Int(2),
            Param::Int(2024),
            Param::Int(14),
            Param::Null,
        ]
    );
}
