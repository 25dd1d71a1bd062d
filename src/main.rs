// ==========================================
// 用量计费系统 - HTTP 服务主入口
// ==========================================
// 配置: .env / 环境变量（见 config::server_config）
// 日志: RUST_LOG 控制级别，BILLING_LOG_FORMAT 控制格式
// ==========================================

use usage_billing::app::{build_router, AppState};
use usage_billing::config::ServerConfig;
use usage_billing::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 文件可选
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    logging::init(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("用量计费系统 - {}", usage_billing::APP_NAME);
    tracing::info!("系统版本: {}", usage_billing::VERSION);
    tracing::info!("==================================================");

    let addr = config.listen_addr();
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("服务已启动: {}", addr);
    tracing::info!("Endpoints: /health, /api/status, /api/upload/*, /api/reports/:kind, /api/export/:report_type");

    axum::serve(listener, app).await?;
    Ok(())
}
