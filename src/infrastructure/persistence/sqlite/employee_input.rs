//! Employee Input Validation
//!
//! 员工写入参数校验，与 ORM 客户端一样在落库前拒绝非法参数

use serde_json::{Map, Value};

use crate::application::ports::RepositoryError;
use crate::domain::Role;

const FIELDS: [&str; 3] = ["name", "email", "role"];

/// 写操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteOp {
    Create,
    Update,
}

impl WriteOp {
    fn as_str(&self) -> &'static str {
        match self {
            WriteOp::Create => "create",
            WriteOp::Update => "update",
        }
    }
}

/// 校验后的员工字段，缺失字段为 None
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct EmployeeInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// 校验未类型化输入
///
/// 所有问题一次性收集，每条一行
pub(crate) fn parse_input(op: WriteOp, input: Value) -> Result<EmployeeInput, RepositoryError> {
    let fields = match input {
        Value::Object(fields) => fields,
        other => {
            return Err(invalid(
                op,
                vec![format!(
                    "Argument `data`: Invalid value provided. Expected Object, provided {}.",
                    type_name(&other)
                )],
            ))
        }
    };

    let mut problems = Vec::new();

    for key in fields.keys() {
        if !FIELDS.contains(&key.as_str()) {
            problems.push(format!(
                "Unknown argument `{}`. Available options are: {}.",
                key,
                FIELDS.join(", ")
            ));
        }
    }

    let name = string_field(&fields, "name", &mut problems);
    let email = string_field(&fields, "email", &mut problems);
    let role = role_field(&fields, &mut problems);

    if op == WriteOp::Create {
        for (key, present) in [
            ("name", fields.contains_key("name")),
            ("email", fields.contains_key("email")),
            ("role", fields.contains_key("role")),
        ] {
            if !present {
                problems.push(format!("Argument `{}` is missing.", key));
            }
        }
    }

    if problems.is_empty() {
        Ok(EmployeeInput { name, email, role })
    } else {
        Err(invalid(op, problems))
    }
}

fn string_field(fields: &Map<String, Value>, key: &str, problems: &mut Vec<String>) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => {
            problems.push(format!("Argument `{}` must not be null.", key));
            None
        }
        other => {
            problems.push(format!(
                "Argument `{}`: Invalid value provided. Expected String, provided {}.",
                key,
                type_name(other)
            ));
            None
        }
    }
}

fn role_field(fields: &Map<String, Value>, problems: &mut Vec<String>) -> Option<Role> {
    let value = fields.get("role")?;
    let role = value.as_str().and_then(Role::from_str);
    if role.is_none() {
        let expected: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
        problems.push(format!(
            "Invalid value for argument `role`. Expected Role ({}), provided {}.",
            expected.join(" | "),
            value
        ));
    }
    role
}

fn invalid(op: WriteOp, problems: Vec<String>) -> RepositoryError {
    RepositoryError::Validation(format!(
        "\nInvalid `employee.{}()` invocation:\n\n{}\n",
        op.as_str(),
        problems.join("\n")
    ))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "Int",
        Value::Number(_) => "Float",
        Value::String(_) => "String",
        Value::Array(_) => "List",
        Value::Object(_) => "Object",
    }
}
