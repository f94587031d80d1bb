//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod employee_input;
mod employee_repo;

pub use database::*;
pub use employee_repo::*;
