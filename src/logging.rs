//! Logging
//!
//! tracing 订阅者初始化：stdout（纯文本或 JSON），可选按天滚动的日志文件

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

const LOG_FILE_NAME: &str = "roster.log";

/// 默认过滤规则，RUST_LOG 存在时以其为准
pub fn default_filter(level: &str) -> String {
    format!("{},roster={},tower_http=debug", level, level)
}

/// 初始化日志系统
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(&config.level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = if config.json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    let file_layer = config.file_dir.as_ref().map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_NAME);
        fmt::layer().with_ansi(false).with_writer(appender)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let filter = default_filter("debug");
        assert_eq!(filter, "debug,roster=debug,tower_http=debug");
        assert!(EnvFilter::try_new(filter).is_ok());
    }
}
