//! # 基础设施组合层
//!
//! 负责把模块集合组合成一个可运行的应用：扫描模块、注册组件、注入启动上下文、
//! 静态校验依赖图、构造单例并建立事件处理器注册表。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::{StaticModule, TypeRegistration};
//! use infrastructure_common::StartupContext;
//! use infrastructure_composition::CompositionBuilder;
//!
//! fn manifest() -> Vec<TypeRegistration> {
//!     Vec::new()
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let root = CompositionBuilder::new()
//!         .add_module(StaticModule::new("core", manifest))
//!         .with_startup_context(StartupContext::from_env())
//!         .build()?;
//!
//!     root.start().await?;
//!     root.shutdown(false).await?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod logging;
pub mod root;
pub mod settings;

pub use builder::CompositionBuilder;
pub use logging::{init_logging, LoggingConfig};
pub use root::{CompositionRoot, CompositionStatus};
pub use settings::{CompositionSettings, LoggingSettings, DEFAULT_ENV_PREFIX};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;

#[cfg(test)]
mod tests;
