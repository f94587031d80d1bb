//! 应用层
//!
//! 包含：
//! - ports: 六边形架构端口定义（UserStore、EmployeeRepository）

pub mod ports;

pub use ports::{EmployeeRepositoryPort, RepositoryError, UserStoreError, UserStorePort};
