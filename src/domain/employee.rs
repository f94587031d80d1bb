//! Employee Entity
//!
//! 员工记录由持久层拥有，这里只描述其形状

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 员工 ID（数据库自增）
pub type EmployeeId = i64;

/// 员工角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Intern,
    Engineer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Intern, Role::Engineer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Intern => "INTERN",
            Role::Engineer => "ENGINEER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "INTERN" => Some(Role::Intern),
            "ENGINEER" => Some(Role::Engineer),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// 员工实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
