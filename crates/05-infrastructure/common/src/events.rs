//! 事件与事件处理器契约
//!
//! `Handle<E>` 是注册表按能力查询的核心契约：每个实现者为一个事件类型提供一次处理。

use crate::metadata::TypeInfo;
use async_trait::async_trait;
use std::fmt::Debug;

/// 事件处理结果
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// 事件标记 trait
pub trait Event: Send + Sync + Debug + 'static {}

/// 事件处理器 trait
#[async_trait]
pub trait Handle<E: Event>: Send + Sync + 'static {
    /// 处理事件
    async fn handle(&self, event: &E) -> HandlerResult;

    /// 处理器的具体类型
    fn handler_type(&self) -> TypeInfo {
        TypeInfo::of::<Self>()
    }
}

/// 应用启动完成事件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationStartedEvent;

impl Event for ApplicationStartedEvent {}

/// 应用请求关闭事件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationShutdownRequested {
    /// 关闭后是否重启
    pub restarting: bool,
}

impl ApplicationShutdownRequested {
    /// 创建关闭事件
    pub const fn new(restarting: bool) -> Self {
        Self { restarting }
    }
}

impl Event for ApplicationShutdownRequested {}
