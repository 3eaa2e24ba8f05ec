use crate::config::Config;
use crate::startup::startup::Application;
use crate::utils::logger::init_logger;
use anyhow::Context;

mod config;
mod database;
mod errors;
mod infrastructure;
mod models;
mod repositories;
mod services;
mod startup;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志（全局只需调用一次）
    init_logger();

    log_info!("Starting application initialization...");

    // 1. 加载配置
    let config = Config::load().context("Failed to load application configuration")?;

    // 2. 构建应用实例（初始化连接池/Provider/服务装配）
    let application = Application::build(config)
        .await
        .context("Application building failed (DB/RPC initialization)")?;

    log_info!("Application build complete. Starting indexing services.");

    // 3. 运行核心服务（回填 + 实时跟踪）
    application
        .run()
        .await
        .context("Application core service failed during runtime")?;

    Ok(())
}
