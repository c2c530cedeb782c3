//! # Drywall Server
//!
//! 石膏板机器人 REST 控制服务。
//!
//! ```bash
//! # 默认配置，监听 0.0.0.0:8000
//! drywall-server
//!
//! # 指定配置文件并加快 tick
//! drywall-server --config robot.toml --tick-ms 100
//! ```
//!
//! 日志级别通过 `RUST_LOG` 调整，例如 `RUST_LOG=drywall_driver=trace`。

use anyhow::{Context, Result};
use clap::Parser;
use drywall_client::RobotService;
use drywall_tools::RobotConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// 石膏板机器人控制服务
#[derive(Parser, Debug)]
#[command(name = "drywall-server")]
#[command(about = "REST control service for the drywall robot", long_about = None)]
#[command(version)]
struct Args {
    /// HTTP 监听地址
    ///
    /// 格式: IP:PORT
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: String,

    /// TOML 配置文件路径（可选）
    ///
    /// 不指定时使用内置默认值
    #[arg(long)]
    config: Option<PathBuf>,

    /// 覆盖模拟器 tick 周期（毫秒）
    #[arg(long)]
    tick_ms: Option<u64>,
}

fn load_config(args: &Args) -> Result<RobotConfig> {
    let mut config = match &args.config {
        Some(path) => RobotConfig::load_from_file(path)?,
        None => RobotConfig::default(),
    };
    if let Some(tick_ms) = args.tick_ms {
        config.simulator.tick_period_ms = tick_ms;
    }
    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("drywall_server=info".parse().unwrap())
                .add_directive("drywall_client=info".parse().unwrap())
                .add_directive("drywall_driver=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!(
        "Config: tick={} ms, min_battery={}%, max_speed={} m/s",
        config.simulator.tick_period_ms, config.safety.min_battery, config.safety.max_speed
    );

    let service = Arc::new(RobotService::new(config));
    service.start().context("启动模拟器失败")?;

    let app = drywall_server::router(service.clone());
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("绑定地址失败: {}", args.bind))?;
    info!("Drywall Robot API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    service.shutdown().await.context("停止模拟器失败")?;
    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(config: Option<PathBuf>, tick_ms: Option<u64>) -> Args {
        Args {
            bind: "127.0.0.1:0".to_string(),
            config,
            tick_ms,
        }
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["drywall-server"]);
        assert_eq!(args.bind, "0.0.0.0:8000");
        assert!(args.config.is_none());
        assert!(args.tick_ms.is_none());
    }

    #[test]
    fn test_tick_override() {
        let config = load_config(&args(None, Some(100))).unwrap();
        assert_eq!(config.simulator.tick_period_ms, 100);

        // 0 周期无法通过校验
        assert!(load_config(&args(None, Some(0))).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[safety]\nmin_battery = 25.0").unwrap();

        let config = load_config(&args(Some(file.path().to_path_buf()), None)).unwrap();
        assert_eq!(config.safety.min_battery, 25.0);
        assert_eq!(config.simulator.tick_period_ms, 1000);
    }
}
