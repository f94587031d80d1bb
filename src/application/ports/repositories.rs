//! Repository Ports - 出站端口
//!
//! 定义员工持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Employee, EmployeeId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// 输入校验失败，消息可能包含多行
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(err.to_string())
    }
}

/// Employee Repository Port
///
/// 输入为未类型化的 JSON，由实现负责校验
#[async_trait]
pub trait EmployeeRepositoryPort: Send + Sync {
    /// 创建员工
    async fn create(&self, input: Value) -> Result<Employee, RepositoryError>;

    /// 获取所有员工
    async fn find_all(&self) -> Result<Vec<Employee>, RepositoryError>;

    /// 根据 ID 查找员工
    async fn find_one(&self, id: EmployeeId) -> Result<Employee, RepositoryError>;

    /// 部分更新员工
    async fn update(&self, id: EmployeeId, input: Value) -> Result<Employee, RepositoryError>;

    /// 删除员工，返回被删除的记录
    async fn remove(&self, id: EmployeeId) -> Result<Employee, RepositoryError>;
}
