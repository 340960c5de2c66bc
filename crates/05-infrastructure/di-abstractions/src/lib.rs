//! # DI Abstractions
//!
//! 组件组合与事件处理器注册表的抽象层。
//!
//! ## 核心抽象
//!
//! - [`CapabilityKey`] / [`Capability`] - 能力描述符与能力视图
//! - [`TypeRegistration`] / [`RegistrationBuilder`] - 清单中的注册项
//! - [`ModuleSet`] / [`ModuleSource`] - 待扫描的模块集合
//! - [`CapabilityScanner`] - 能力扫描器
//! - [`Resolver`] / [`ResolveContext`] - 依赖解析与循环检测
//! - [`DependencyGraph`] - 静态依赖图校验与拓扑排序
//! - [`DiContainer`] - 依赖注入容器

pub mod capability;
pub mod container;
pub mod graph;
pub mod module;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use capability::*;
pub use container::*;
pub use graph::*;
pub use module::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;

pub use infrastructure_common::{
    ComponentError, DependencyError, Event, Handle, HandlerResult, Lifetime, ModuleLoadError,
    TypeInfo,
};
