//! 领域层
//!
//! - user: 进程内用户记录
//! - employee: 持久化员工记录

pub mod employee;
pub mod user;

pub use employee::{Employee, EmployeeId, Role};
pub use user::{NewUser, User, UserId, UserPatch};
