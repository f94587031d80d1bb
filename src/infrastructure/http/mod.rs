//! HTTP Layer - RESTful API
//!
//! 路由、错误归一化、限流与服务器启动

pub mod envelope;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod throttle;

pub use envelope::{normalize_errors, ErrorEnvelope};
pub use error::{ApiError, Failure, HttpPayload};
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
pub use throttle::{RateLimiter, ThrottlePolicy, ThrottleTier};
