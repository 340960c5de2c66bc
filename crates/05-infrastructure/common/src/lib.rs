//! # Infrastructure Common
//!
//! 组合层与注册表共享的基础类型。
//!
//! ## 核心内容
//!
//! - [`TypeInfo`] - 组件类型身份（`TypeId` + 完整限定名称）
//! - [`Lifetime`] - 组件构造策略（单例 / 瞬时）
//! - [`Event`] / [`Handle`] - 事件与事件处理器契约
//! - [`StartupContext`] - 启动参数上下文
//! - 错误类型：[`DependencyError`]、[`ComponentError`]、[`ModuleLoadError`]、[`InfrastructureError`]

pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod metadata;
pub mod startup;

pub use errors::*;
pub use events::*;
pub use lifecycle::*;
pub use metadata::*;
pub use startup::*;
