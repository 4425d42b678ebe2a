//! BGU ERP 授权网关

mod authz;
mod config;
mod middleware;
mod routing;
mod state;

use std::net::SocketAddr;

use anyhow::Context;
use bgu_config::AppConfig;
use bgu_telemetry::{init_metrics, init_tracing, init_tracing_json};
use tracing::info;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 加载配置
    let config = AppConfig::load("config").context("Failed to load configuration")?;

    // 初始化 tracing
    if config.telemetry.json {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    let metrics = init_metrics().context("Failed to install Prometheus recorder")?;
    let gate = config::build_gate(&config)?;
    let app = routing::app(AppState::new(gate, Some(metrics)));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;

    info!(%addr, app = %config.app_name, env = %config.app_env, "Starting gateway");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
