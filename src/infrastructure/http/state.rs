//! Application State
//!
//! 显式持有的共享状态，通过 axum State 注入各 handler

use std::sync::Arc;

use crate::application::{EmployeeRepositoryPort, UserStorePort};
use crate::infrastructure::http::throttle::{RateLimiter, ThrottlePolicy};

/// 应用状态
pub struct AppState {
    pub user_store: Arc<dyn UserStorePort>,
    pub employee_repo: Arc<dyn EmployeeRepositoryPort>,
    pub rate_limiter: Arc<RateLimiter>,
    /// 未被路由覆盖时使用的限流档位
    pub default_throttle: ThrottlePolicy,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        user_store: Arc<dyn UserStorePort>,
        employee_repo: Arc<dyn EmployeeRepositoryPort>,
        rate_limiter: Arc<RateLimiter>,
        default_throttle: ThrottlePolicy,
    ) -> Self {
        Self {
            user_store,
            employee_repo,
            rate_limiter,
            default_throttle,
        }
    }
}
