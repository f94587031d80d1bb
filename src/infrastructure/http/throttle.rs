//! Rate Limiting
//!
//! 固定窗口限流，按 (tier, route, client) 计数。
//! 限流作为中间件显式挂在单条路由上，见 routes.rs。

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use parking_lot::Mutex;

use super::error::ApiError;

/// 窗口数量超过该值后才考虑清理
const PURGE_THRESHOLD: usize = 10_000;
/// 两次清理之间的最小间隔
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// 单个限流档位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleTier {
    pub name: String,
    pub ttl: Duration,
    pub limit: u32,
}

impl ThrottleTier {
    pub fn new(name: impl Into<String>, ttl: Duration, limit: u32) -> Self {
        Self {
            name: name.into(),
            ttl,
            limit,
        }
    }
}

/// 一条路由生效的档位集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThrottlePolicy {
    tiers: Vec<ThrottleTier>,
}

impl ThrottlePolicy {
    pub fn new(tiers: Vec<ThrottleTier>) -> Self {
        Self { tiers }
    }

    /// 覆盖同名档位，不存在时追加
    pub fn with_override(mut self, name: &str, ttl: Duration, limit: u32) -> Self {
        match self.tiers.iter_mut().find(|tier| tier.name == name) {
            Some(tier) => {
                tier.ttl = ttl;
                tier.limit = limit;
            }
            None => self.tiers.push(ThrottleTier::new(name, ttl, limit)),
        }
        self
    }

    pub fn tiers(&self) -> &[ThrottleTier] {
        &self.tiers
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    ttl: Duration,
    count: u32,
}

/// 进程内限流器
pub struct RateLimiter {
    enabled: bool,
    windows: DashMap<String, Window>,
    purge_threshold: usize,
    purge_interval: Duration,
    last_purge: Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            windows: DashMap::new(),
            purge_threshold: PURGE_THRESHOLD,
            purge_interval: PURGE_INTERVAL,
            last_purge: Mutex::new(Instant::now()),
        }
    }

    /// 记录一次请求；超限时返回需要等待的时长
    pub fn check(&self, route: &str, client: &str, policy: &ThrottlePolicy) -> Result<(), Duration> {
        self.check_at(route, client, policy, Instant::now())
    }

    fn check_at(
        &self,
        route: &str,
        client: &str,
        policy: &ThrottlePolicy,
        now: Instant,
    ) -> Result<(), Duration> {
        if !self.enabled {
            return Ok(());
        }

        self.maybe_purge(now);

        for tier in policy.tiers() {
            let key = format!("{}:{}:{}", tier.name, route, client);
            let mut window = self.windows.entry(key).or_insert_with(|| Window {
                started: now,
                ttl: tier.ttl,
                count: 0,
            });

            let elapsed = now.saturating_duration_since(window.started);
            if elapsed >= tier.ttl {
                window.started = now;
                window.count = 0;
            }
            window.ttl = tier.ttl;
            window.count += 1;

            if window.count > tier.limit {
                return Err(tier.ttl.saturating_sub(now.saturating_duration_since(window.started)));
            }
        }

        Ok(())
    }

    /// 窗口过多且距上次清理超过间隔时才全表扫描
    fn maybe_purge(&self, now: Instant) {
        if self.windows.len() <= self.purge_threshold {
            return;
        }
        {
            let Some(mut last) = self.last_purge.try_lock() else {
                return;
            };
            if now.saturating_duration_since(*last) < self.purge_interval {
                return;
            }
            *last = now;
        }
        self.purge_expired(now);
    }

    /// 清理已过期的窗口
    pub fn purge_expired(&self, now: Instant) {
        self.windows
            .retain(|_, window| now.saturating_duration_since(window.started) < window.ttl);
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }
}

/// 路由级限流中间件的状态
#[derive(Clone)]
pub struct ThrottleGuard {
    limiter: Arc<RateLimiter>,
    policy: Arc<ThrottlePolicy>,
}

impl ThrottleGuard {
    pub fn new(limiter: Arc<RateLimiter>, policy: ThrottlePolicy) -> Self {
        Self {
            limiter,
            policy: Arc::new(policy),
        }
    }
}

/// 限流中间件
pub async fn throttle(State(guard): State<ThrottleGuard>, request: Request, next: Next) -> Response {
    let route = format!(
        "{} {}",
        request.method(),
        request
            .extensions()
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| request.uri().path().to_string())
    );
    let client = client_ip(&request);

    if let Err(retry_after) = guard.limiter.check(&route, &client, &guard.policy) {
        tracing::warn!(route = %route, client = %client, "Rate limit exceeded");
        let mut response = ApiError::too_many_requests().into_response();
        let secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
        if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return response;
    }

    next.run(request).await
}

/// 客户端 IP，未知时为 "unknown"
pub fn client_ip(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
