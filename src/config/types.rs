//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::infrastructure::http::{ThrottlePolicy, ThrottleTier};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 限流配置
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 全局路由前缀（不含斜杠）
    #[serde(default = "default_global_prefix")]
    pub global_prefix: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_global_prefix() -> String {
    "api".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            global_prefix: default_global_prefix(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/roster.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 限流档位
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThrottleTierConfig {
    pub name: String,
    /// 窗口长度（毫秒）
    pub ttl_ms: u64,
    /// 窗口内允许的请求数
    pub limit: u32,
}

/// 限流配置
#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_throttle_enabled")]
    pub enabled: bool,

    #[serde(default = "default_tiers")]
    pub tiers: Vec<ThrottleTierConfig>,
}

fn default_throttle_enabled() -> bool {
    true
}

fn default_tiers() -> Vec<ThrottleTierConfig> {
    vec![
        ThrottleTierConfig {
            name: "short".to_string(),
            ttl_ms: 1000,
            limit: 3,
        },
        ThrottleTierConfig {
            name: "long".to_string(),
            ttl_ms: 60_000,
            limit: 100,
        },
    ]
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: default_throttle_enabled(),
            tiers: default_tiers(),
        }
    }
}

impl ThrottleConfig {
    /// 转换为默认限流策略
    pub fn policy(&self) -> ThrottlePolicy {
        ThrottlePolicy::new(
            self.tiers
                .iter()
                .map(|t| ThrottleTier::new(t.name.clone(), Duration::from_millis(t.ttl_ms), t.limit))
                .collect(),
        )
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,

    /// 日志文件目录，未设置时只输出到 stdout
    #[serde(default)]
    pub file_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.global_prefix, "api");
        assert_eq!(config.database.path, "data/roster.db");
        assert!(config.throttle.enabled);
        assert!(config.log.file_dir.is_none());
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_url(), "sqlite:data/roster.db?mode=rwc");
    }

    #[test]
    fn test_throttle_policy_from_tiers() {
        let policy = ThrottleConfig::default().policy();
        assert_eq!(policy.tiers().len(), 2);
        assert_eq!(policy.tiers()[0].name, "short");
        assert_eq!(policy.tiers()[0].ttl, Duration::from_secs(1));
        assert_eq!(policy.tiers()[1].limit, 100);
    }
}
