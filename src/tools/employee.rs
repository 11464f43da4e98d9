//! Employee lookup and maintenance tools.

use tracing::info;

use crate::catalog::ArgMap;
use crate::envelope::Envelope;
use crate::error::{GatewayError, GatewayResult};
use crate::store::{Param, Store};
use crate::tools::fields::FieldSet;
use crate::tools::{arg_str, opt_param, opt_str};

/// Fixed argument-to-column pairs update_employee may touch.
const UPDATE_FIELDS: &[(&str, &str)] = &[
    ("employee_name", "employee_name"),
    ("department", "department"),
    ("position", "position"),
    ("email", "email"),
    ("phone", "phone"),
    ("status", "status"),
];

/// Fetch one employee by id, or all employees ordered by id.
pub async fn get_employee_info<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let rows = match opt_str(args, "employee_id") {
        Some(employee_id) => {
            store
                .fetch(
                    "SELECT * FROM employees WHERE employee_id = ?",
                    &[Param::from(employee_id)],
                )
                .await?
        }
        None => {
            store
                .fetch("SELECT * FROM employees ORDER BY employee_id", &[])
                .await?
        }
    };
    info!(employees = rows.len(), "Fetched employee info");
    Ok(Envelope::rows("Employee info", &rows))
}

/// Insert a new employee record with status 'active'.
pub async fn add_employee<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let employee_id = arg_str(args, "employee_id")?;
    let employee_name = arg_str(args, "employee_name")?;

    let summary = store
        .execute(
            "INSERT INTO employees \
             (employee_id, employee_name, department, position, hire_date, email, phone, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, 'active')",
            &[
                Param::from(employee_id),
                Param::from(employee_name),
                Param::from(arg_str(args, "department")?),
                Param::from(arg_str(args, "position")?),
                Param::from(arg_str(args, "hire_date")?),
                opt_param(args, "email"),
                opt_param(args, "phone"),
            ],
        )
        .await?;

    info!(employee_id = %employee_id, "Added employee");
    Ok(Envelope::mutation(
        "Employee added",
        &summary,
        &format!("Employee {} ({}) created", employee_id, employee_name),
    ))
}

/// Update the supplied fields of an existing employee.
pub async fn update_employee<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let employee_id = arg_str(args, "employee_id")?;

    let set = FieldSet::collect(args, UPDATE_FIELDS);
    set.ensure_nonempty()?;

    let sql = format!(
        "UPDATE employees SET {} WHERE employee_id = ?",
        set.set_clause()
    );
    let params = set.into_params([Param::from(employee_id)]);
    let summary = store.execute(&sql, &params).await?;

    if summary.rows_affected == 0 {
        return Err(GatewayError::row_not_found(format!(
            "No employee found with id {}",
            employee_id
        )));
    }

    info!(employee_id = %employee_id, "Updated employee");
    Ok(Envelope::mutation(
        "Employee updated",
        &summary,
        &format!("Employee {} updated", employee_id),
    ))
}

/// Flip an active employee to inactive.
pub async fn deactivate_employee<S: Store>(store: &S, args: &ArgMap) -> GatewayResult<Envelope> {
    let employee_id = arg_str(args, "employee_id")?;

    let summary = store
        .execute(
            "UPDATE employees SET status = 'inactive' \
             WHERE employee_id = ? AND status = 'active'",
            &[Param::from(employee_id)],
        )
        .await?;

    if summary.rows_affected == 0 {
        return Err(GatewayError::row_not_found(format!(
            "No active employee found with id {}",
            employee_id
        )));
    }

    info!(employee_id = %employee_id, "Deactivated employee");
    Ok(Envelope::mutation(
        "Employee deactivated",
        &summary,
        &format!("Employee {} deactivated", employee_id),
    ))
}
