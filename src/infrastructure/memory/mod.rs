//! In-Memory Implementations
//!
//! 进程内状态存储

mod user_store;

pub use user_store::InMemoryUserStore;
