//! # 启动宿主
//!
//! 解析命令行参数，组合演示模块并发布生命周期事件。
//!
//! 宿主自身的选项之后，`--` 之后的参数原样传入 [`StartupContext`]：
//!
//! ```text
//! app-host --log-level debug -- -data=/srv/app -nobrowser
//! ```

mod demo;

use anyhow::Context;
use clap::Parser;
use di_abstractions::StaticModule;
use infrastructure_common::StartupContext;
use infrastructure_composition::{
    init_logging, CompositionBuilder, CompositionSettings, LoggingConfig, DEFAULT_ENV_PREFIX,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "app-host")]
#[command(about = "组件组合启动宿主")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别，覆盖配置文件
    #[arg(long)]
    log_level: Option<String>,

    /// 环境变量前缀
    #[arg(long, default_value = DEFAULT_ENV_PREFIX)]
    env_prefix: String,

    /// 传给应用的启动参数
    #[arg(last = true)]
    startup_args: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // 日志尚未初始化时使用默认配置输出
            let _ = init_logging(&LoggingConfig::default());
            error!("应用启动失败: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut settings = CompositionSettings::load(args.config.as_deref(), &args.env_prefix)
        .context("加载配置失败")?;
    if let Some(level) = args.log_level {
        settings.logging.level = level;
    }
    init_logging(&settings.logging.to_config()?)?;

    info!("启动宿主, 环境变量前缀: {}", args.env_prefix);

    let root = CompositionBuilder::new()
        .add_module(StaticModule::new("core", demo::core_manifest))
        .add_module(StaticModule::new("lifecycle", demo::lifecycle_manifest))
        .with_startup_context(StartupContext::new(args.startup_args))
        .with_settings(settings)
        .build()
        .context("组合失败")?;

    for diagnostic in root.diagnostics() {
        warn!("{}", diagnostic);
    }

    let started = root.start().await?;
    info!(
        "启动事件已投递: {} 个处理器成功, {} 个失败",
        started.delivered,
        started.failed.len()
    );

    let stopped = root.shutdown(false).await?;
    if !stopped.is_success() {
        warn!("关闭事件有 {} 个处理器失败", stopped.failed.len());
    }

    info!("应用已关闭");
    Ok(())
}
