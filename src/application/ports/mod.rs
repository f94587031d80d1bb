//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod repositories;
mod user_store;

pub use repositories::{EmployeeRepositoryPort, RepositoryError};
pub use user_store::{UserStoreError, UserStorePort};
