//! Roster - 员工 / 用户 REST 服务

use std::sync::Arc;

use roster::config::{load_config, print_config};
use roster::infrastructure::http::{AppState, HttpServer, RateLimiter, ServerConfig};
use roster::infrastructure::memory::InMemoryUserStore;
use roster::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteEmployeeRepository,
};
use roster::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_logging(&config.log);

    tracing::info!("Roster - employees / users service");
    print_config(&config);

    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let state = AppState::new(
        InMemoryUserStore::seeded().arc(),
        Arc::new(SqliteEmployeeRepository::new(pool)),
        Arc::new(RateLimiter::new(config.throttle.enabled)),
        config.throttle.policy(),
    );

    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        &config.server.global_prefix,
    );
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
