//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量（`PORT` 单独覆盖监听端口）
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `PORT=8080`
/// - `ROSTER_SERVER__HOST=127.0.0.1`
/// - `ROSTER_SERVER__GLOBAL_PREFIX=v1`
/// - `ROSTER_DATABASE__PATH=/data/roster.db`
/// - `ROSTER_THROTTLE__ENABLED=false`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级），限流档位由 serde 默认值提供
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.global_prefix", "api")?
        .set_default("database.path", "data/roster.db")?
        .set_default("database.max_connections", 5)?
        .set_default("throttle.enabled", true)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量，前缀 ROSTER_，层级分隔符 __
    builder = builder.add_source(
        Environment::with_prefix("ROSTER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // PORT 优先于其它所有来源
    let port = match std::env::var("PORT") {
        Ok(raw) => Some(
            raw.trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::ParseError(format!("Invalid PORT '{}': {}", raw, e)))?,
        ),
        Err(_) => None,
    };
    builder = builder.set_override_option("server.port", port.map(i64::from))?;

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    let prefix = &config.server.global_prefix;
    if prefix.is_empty() || prefix.contains('/') {
        return Err(ConfigError::ValidationError(format!(
            "Global prefix must be a non-empty path segment, got '{}'",
            prefix
        )));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for tier in &config.throttle.tiers {
        if tier.ttl_ms == 0 || tier.limit == 0 {
            return Err(ConfigError::ValidationError(format!(
                "Throttle tier '{}' needs a positive ttl and limit",
                tier.name
            )));
        }
        if !names.insert(tier.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Duplicate throttle tier '{}'",
                tier.name
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Global Prefix: /{}", config.server.global_prefix);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Throttle Enabled: {}", config.throttle.enabled);
    if config.throttle.enabled {
        for tier in &config.throttle.tiers {
            tracing::info!("Throttle Tier {}: {} req / {}ms", tier.name, tier.limit, tier.ttl_ms);
        }
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThrottleTierConfig;
    use parking_lot::Mutex;
    use std::io::Write;

    /// 读写进程环境变量的测试串行执行
    static ENV_LOCK: Mutex<()> = parking_lot::const_mutex(());

    /// 设置环境变量，drop 时恢复
    struct EnvVars(Vec<(&'static str, Option<String>)>);

    impl EnvVars {
        fn set(vars: &[(&'static str, Option<&str>)]) -> Self {
            let saved = vars
                .iter()
                .map(|(key, value)| {
                    let previous = std::env::var(key).ok();
                    match value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                    (*key, previous)
                })
                .collect();
            Self(saved)
        }
    }

    impl Drop for EnvVars {
        fn drop(&mut self) {
            for (key, previous) in &self.0 {
                match previous {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_bad_prefix() {
        let mut config = AppConfig::default();
        config.server.global_prefix = String::new();
        assert!(validate_config(&config).is_err());

        config.server.global_prefix = "api/v1".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_bad_tiers() {
        let mut config = AppConfig::default();
        config.throttle.tiers.push(ThrottleTierConfig {
            name: "short".to_string(),
            ttl_ms: 500,
            limit: 1,
        });
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.throttle.tiers[0].limit = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let _lock = ENV_LOCK.lock();
        let _env = EnvVars::set(&[("PORT", None), ("ROSTER_SERVER__PORT", None)]);
        let file = toml_file(
            r#"
[server]
host = "127.0.0.1"
global_prefix = "v1"

[database]
path = "/tmp/roster-test.db"

[[throttle.tiers]]
name = "burst"
ttl_ms = 2000
limit = 5
"#,
        );

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.global_prefix, "v1");
        assert_eq!(config.database.path, "/tmp/roster-test.db");
        assert_eq!(config.throttle.tiers.len(), 1);
        assert_eq!(config.throttle.tiers[0].name, "burst");
    }

    #[test]
    fn test_port_env_overrides_file_and_prefixed_env() {
        let _lock = ENV_LOCK.lock();
        let file = toml_file("[server]\nport = 4000\n");

        let _env = EnvVars::set(&[("PORT", None), ("ROSTER_SERVER__PORT", None)]);
        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 4000);

        let _env = EnvVars::set(&[("ROSTER_SERVER__PORT", Some("5000"))]);
        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 5000);

        let _env = EnvVars::set(&[("PORT", Some(" 6000 "))]);
        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 6000);
    }

    #[test]
    fn test_invalid_port_env_is_parse_error() {
        let _lock = ENV_LOCK.lock();
        let file = toml_file("[server]\nport = 4000\n");

        for raw in ["abc", "70000", ""] {
            let _env = EnvVars::set(&[("PORT", Some(raw))]);
            let result = load_config_from_path(Some(file.path()));
            assert!(
                matches!(result, Err(ConfigError::ParseError(ref msg)) if msg.contains("PORT")),
                "PORT={:?} gave {:?}",
                raw,
                result
            );
        }
    }
}
