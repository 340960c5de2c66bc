//! # 依赖注入具体实现
//!
//! 提供能力扫描器、依赖注入容器、事件处理器注册表和事件聚合器的具体实现。

pub mod container;
pub mod events;
mod guard;
pub mod handlers;
pub mod scanner;

pub use container::DiContainerImpl;
pub use events::{EventAggregator, PublishReport};
pub use handlers::EventHandlerRegistry;
pub use scanner::DefaultCapabilityScanner;
