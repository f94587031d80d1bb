//! HTTP Routes
//!
//! 路由表，限流中间件直接挂在各条路由上
//!
//! API Endpoints（均在全局前缀下，默认 /api）:
//! - /ping              GET     健康检查
//! - /users             GET     列出用户            [默认限流]
//! - /users             POST    创建用户            [默认限流]
//! - /users/:id         GET     用户详情            [默认限流]
//! - /users/:id         PATCH   更新用户            [默认限流]
//! - /users/:id         DELETE  删除用户            [默认限流]
//! - /employees         POST    创建员工
//! - /employees         GET     列出员工            [默认限流]
//! - /employees/:id     GET     员工详情            [short 覆盖为 1 次/秒]
//! - /employees/:id     PATCH   更新员工
//! - /employees/:id     DELETE  删除员工

use axum::{
    middleware,
    routing::{get, patch, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use std::time::Duration;

use super::handlers;
use super::state::AppState;
use super::throttle::{throttle, ThrottleGuard};

const SHORT_TIER: &str = "short";

type AppRouter = Router<Arc<AppState>>;
type AppMethodRouter = MethodRouter<Arc<AppState>>;

/// 创建所有路由
pub fn create_routes(state: &AppState, global_prefix: &str) -> AppRouter {
    let guards = Guards { state };

    Router::new()
        .nest(&format!("/{}", global_prefix), api_routes(&guards))
        .fallback(handlers::route_not_found)
}

/// 从状态生成各路由的限流守卫
struct Guards<'a> {
    state: &'a AppState,
}

impl Guards<'_> {
    fn defaults(&self) -> ThrottleGuard {
        ThrottleGuard::new(
            self.state.rate_limiter.clone(),
            self.state.default_throttle.clone(),
        )
    }

    fn with_override(&self, name: &str, ttl: Duration, limit: u32) -> ThrottleGuard {
        ThrottleGuard::new(
            self.state.rate_limiter.clone(),
            self.state.default_throttle.clone().with_override(name, ttl, limit),
        )
    }
}

fn throttled(route: AppMethodRouter, guard: ThrottleGuard) -> AppMethodRouter {
    route.route_layer(middleware::from_fn_with_state(guard, throttle))
}

/// API 路由
fn api_routes(guards: &Guards<'_>) -> AppRouter {
    Router::new()
        .route("/ping", get(handlers::ping))
        .merge(user_routes(guards))
        .merge(employee_routes(guards))
}

/// User 路由，全部默认限流
fn user_routes(guards: &Guards<'_>) -> AppRouter {
    Router::new()
        .route(
            "/users",
            throttled(
                get(handlers::list_users).post(handlers::create_user),
                guards.defaults(),
            ),
        )
        .route(
            "/users/:id",
            throttled(
                get(handlers::get_user)
                    .patch(handlers::update_user)
                    .delete(handlers::delete_user),
                guards.defaults(),
            ),
        )
}

/// Employee 路由，只有读操作限流
fn employee_routes(guards: &Guards<'_>) -> AppRouter {
    Router::new()
        .route(
            "/employees",
            post(handlers::create_employee)
                .merge(throttled(get(handlers::list_employees), guards.defaults())),
        )
        .route(
            "/employees/:id",
            throttled(
                get(handlers::get_employee),
                guards.with_override(SHORT_TIER, Duration::from_millis(1000), 1),
            )
            .merge(patch(handlers::update_employee).delete(handlers::remove_employee)),
        )
}
