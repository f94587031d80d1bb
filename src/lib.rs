//! Roster - 员工 / 用户 REST 服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/): User、Employee
//!
//! 应用层 (application/):
//! - Ports: UserStorePort（内存 Data-Access Unit）、EmployeeRepositoryPort（持久层）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 路由、错误 envelope、限流
//! - Memory: 内存用户存储
//! - Persistence: SQLite 员工存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use self::config::{load_config, AppConfig};
