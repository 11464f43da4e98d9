//! Statement catalog: the fixed registry of tools the server exposes.
//!
//! Every tool is declared here with its ordered argument list. The catalog is
//! the single source of truth for `list_tools` schemas and for argument
//! validation before a handler runs. Column and argument names never come
//! from caller input.

use serde_json::{Map as JsonMap, Value as JsonValue, json};

use crate::error::{GatewayError, GatewayResult};

/// JSON argument object as received from the MCP client.
pub type ArgMap = JsonMap<String, JsonValue>;

/// JSON Schema primitive type of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ArgType {
    fn json_type(self) -> &'static str {
        match self {
            ArgType::String => "string",
            ArgType::Integer => "integer",
            ArgType::Number => "number",
            ArgType::Boolean => "boolean",
        }
    }

    fn matches(self, value: &JsonValue) -> bool {
        match self {
            ArgType::String => value.is_string(),
            ArgType::Integer => value.as_i64().is_some(),
            ArgType::Number => value.is_number(),
            ArgType::Boolean => value.is_boolean(),
        }
    }
}

/// One declared tool argument.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub arg_type: ArgType,
    pub required: bool,
    pub default: Option<JsonValue>,
    pub allowed: Option<&'static [&'static str]>,
}

impl ArgSpec {
    fn required(name: &'static str, arg_type: ArgType, description: &'static str) -> Self {
        Self {
            name,
            description,
            arg_type,
            required: true,
            default: None,
            allowed: None,
        }
    }

    fn optional(name: &'static str, arg_type: ArgType, description: &'static str) -> Self {
        Self {
            name,
            description,
            arg_type,
            required: false,
            default: None,
            allowed: None,
        }
    }

    fn with_default(mut self, default: JsonValue) -> Self {
        self.default = Some(default);
        self
    }

    fn with_allowed(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }
}

/// One declared tool.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub args: Vec<ArgSpec>,
    /// True when the tool never mutates data.
    pub read_only: bool,
}

impl ToolDefinition {
    /// Validate a caller-supplied argument object against this definition.
    ///
    /// Walks the declared arguments in order: the first missing required
    /// argument wins, declared types and enum values are checked, defaults
    /// are materialized.
    /// Only declared arguments are carried into the result.
    pub fn validate_args(&self, args: &ArgMap) -> GatewayResult<ArgMap> {
        let mut validated = ArgMap::new();
        for spec in &self.args {
            match args.get(spec.name) {
                Some(value) if !value.is_null() => {
                    if !spec.arg_type.matches(value) {
                        return Err(GatewayError::InvalidType {
                            argument: spec.name,
                            value: value.to_string(),
                            expected: spec.arg_type.json_type(),
                        });
                    }
                    if let Some(allowed) = spec.allowed {
                        // Enum arguments are always strings, checked above.
                        let candidate = value.as_str().unwrap_or_default();
                        if !allowed.contains(&candidate) {
                            return Err(GatewayError::InvalidEnum {
                                argument: spec.name,
                                value: candidate.to_string(),
                                allowed: allowed.join(", "),
                            });
                        }
                    }
                    validated.insert(spec.name.to_string(), value.clone());
                }
                _ => {
                    if spec.required {
                        return Err(GatewayError::MissingArgument { name: spec.name });
                    }
                    if let Some(default) = &spec.default {
                        validated.insert(spec.name.to_string(), default.clone());
                    }
                }
            }
        }
        Ok(validated)
    }

    /// Render the JSON Schema object advertised through `list_tools`.
    pub fn input_schema(&self) -> JsonMap<String, JsonValue> {
        let mut properties = JsonMap::new();
        let mut required = Vec::new();
        for spec in &self.args {
            let mut property = JsonMap::new();
            property.insert("type".to_string(), json!(spec.arg_type.json_type()));
            property.insert("description".to_string(), json!(spec.description));
            if let Some(allowed) = spec.allowed {
                property.insert("enum".to_string(), json!(allowed));
            }
            if let Some(default) = &spec.default {
                property.insert("default".to_string(), default.clone());
            }
            properties.insert(spec.name.to_string(), JsonValue::Object(property));
            if spec.required {
                required.push(spec.name);
            }
        }

        let mut schema = JsonMap::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), JsonValue::Object(properties));
        schema.insert("required".to_string(), json!(required));
        schema
    }
}

/// The full, ordered tool registry.
#[derive(Debug, Clone)]
pub struct Catalog {
    tools: Vec<ToolDefinition>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tools: vec![
                ToolDefinition {
                    name: "get_tables_info",
                    description: "List all tables in the attendance database with comments and estimated row counts",
                    args: vec![],
                    read_only: true,
                },
                ToolDefinition {
                    name: "get_table_structure",
                    description: "Show the column layout of one table (name, type, nullability, key, default, comment)",
                    args: vec![ArgSpec::required(
                        "table_name",
                        ArgType::String,
                        "Name of the table to describe",
                    )],
                    read_only: true,
                },
                ToolDefinition {
                    name: "query_database",
                    description: "Execute a SQL statement. Write statements (INSERT/UPDATE/DELETE) and unrecognized statements require confirm_write=true",
                    args: vec![
                        ArgSpec::required("sql", ArgType::String, "The SQL statement to execute"),
                        ArgSpec::optional(
                            "confirm_write",
                            ArgType::Boolean,
                            "Must be true to execute a write statement",
                        )
                        .with_default(json!(false)),
                    ],
                    read_only: false,
                },
                ToolDefinition {
                    name: "get_employee_info",
                    description: "Fetch employee records, all employees or one by id",
                    args: vec![ArgSpec::optional(
                        "employee_id",
                        ArgType::String,
                        "Employee id to look up; omit to list all employees",
                    )],
                    read_only: true,
                },
                ToolDefinition {
                    name: "get_leave_balance",
                    description: "Fetch an employee's leave balances (total, used, remaining days) for a year",
                    args: vec![
                        ArgSpec::required("employee_id", ArgType::String, "Employee id"),
                        ArgSpec::optional("year", ArgType::Integer, "Balance year")
                            .with_default(json!(2024)),
                    ],
                    read_only: true,
                },
                ToolDefinition {
                    name: "get_leave_requests",
                    description: "List leave requests with optional filters, newest first",
                    args: vec![
                        ArgSpec::optional("employee_id", ArgType::String, "Filter by employee id"),
                        ArgSpec::optional("status", ArgType::String, "Filter by request status")
                            .with_allowed(&["pending", "approved", "rejected", "cancelled"]),
                        ArgSpec::optional(
                            "start_date",
                            ArgType::String,
                            "Only requests starting on or after this date (YYYY-MM-DD)",
                        ),
                        ArgSpec::optional(
                            "end_date",
                            ArgType::String,
                            "Only requests ending on or before this date (YYYY-MM-DD)",
                        ),
                    ],
                    read_only: true,
                },
                ToolDefinition {
                    name: "add_employee",
                    description: "Create a new employee record with status 'active'",
                    args: vec![
                        ArgSpec::required("employee_id", ArgType::String, "Unique employee id"),
                        ArgSpec::required("employee_name", ArgType::String, "Full name"),
                        ArgSpec::required("department", ArgType::String, "Department name"),
                        ArgSpec::required("position", ArgType::String, "Job title"),
                        ArgSpec::required(
                            "hire_date",
                            ArgType::String,
                            "Hire date (YYYY-MM-DD)",
                        ),
                        ArgSpec::optional("email", ArgType::String, "Email address"),
                        ArgSpec::optional("phone", ArgType::String, "Phone number"),
                    ],
                    read_only: false,
                },
                ToolDefinition {
                    name: "update_employee",
                    description: "Update fields of an existing employee; only supplied fields change",
                    args: vec![
                        ArgSpec::required("employee_id", ArgType::String, "Employee id to update"),
                        ArgSpec::optional("employee_name", ArgType::String, "New full name"),
                        ArgSpec::optional("department", ArgType::String, "New department"),
                        ArgSpec::optional("position", ArgType::String, "New job title"),
                        ArgSpec::optional("email", ArgType::String, "New email address"),
                        ArgSpec::optional("phone", ArgType::String, "New phone number"),
                        ArgSpec::optional("status", ArgType::String, "New status")
                            .with_allowed(&["active", "inactive"]),
                    ],
                    read_only: false,
                },
                ToolDefinition {
                    name: "deactivate_employee",
                    description: "Mark an active employee as inactive",
                    args: vec![ArgSpec::required(
                        "employee_id",
                        ArgType::String,
                        "Employee id to deactivate",
                    )],
                    read_only: false,
                },
                ToolDefinition {
                    name: "submit_leave_request",
                    description: "Submit a new leave request in 'pending' status",
                    args: vec![
                        ArgSpec::required("employee_id", ArgType::String, "Requesting employee id"),
                        ArgSpec::required(
                            "leave_type_code",
                            ArgType::String,
                            "Leave type code, e.g. ANNUAL or SICK",
                        ),
                        ArgSpec::required(
                            "start_date",
                            ArgType::String,
                            "First day of leave (YYYY-MM-DD)",
                        ),
                        ArgSpec::required(
                            "end_date",
                            ArgType::String,
                            "Last day of leave (YYYY-MM-DD)",
                        ),
                        ArgSpec::required(
                            "days_requested",
                            ArgType::Number,
                            "Number of leave days, half days allowed",
                        ),
                        ArgSpec::optional("reason", ArgType::String, "Reason for the leave"),
                    ],
                    read_only: false,
                },
                ToolDefinition {
                    name: "approve_leave_request",
                    description: "Approve or reject a pending leave request; approval books the days against the balance",
                    args: vec![
                        ArgSpec::required("request_id", ArgType::Integer, "Leave request id"),
                        ArgSpec::required("action", ArgType::String, "Decision")
                            .with_allowed(&["approved", "rejected"]),
                        ArgSpec::required("approved_by", ArgType::String, "Approver employee id"),
                    ],
                    read_only: false,
                },
                ToolDefinition {
                    name: "cancel_leave_request",
                    description: "Cancel a pending or approved leave request",
                    args: vec![ArgSpec::required(
                        "request_id",
                        ArgType::Integer,
                        "Leave request id to cancel",
                    )],
                    read_only: false,
                },
                ToolDefinition {
                    name: "update_leave_balance",
                    description: "Set an employee's leave balance for a year, updating the existing row or creating one",
                    args: vec![
                        ArgSpec::required("employee_id", ArgType::String, "Employee id"),
                        ArgSpec::required(
                            "leave_type_code",
                            ArgType::String,
                            "Leave type code, e.g. ANNUAL or SICK",
                        ),
                        ArgSpec::required("year", ArgType::Integer, "Balance year"),
                        ArgSpec::optional("total_days", ArgType::Number, "Total allotted days"),
                        ArgSpec::optional("used_days", ArgType::Number, "Days already used"),
                    ],
                    read_only: false,
                },
            ],
        }
    }

    /// All tool definitions in declaration order.
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Look a tool up by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
