//! 事件聚合器
//!
//! 按注册表顺序把事件投递给每个处理器类一次，单个处理器失败不会影响其余处理器。

use crate::container::DiContainerImpl;
use crate::handlers::EventHandlerRegistry;
use di_abstractions::DiContainer;
use infrastructure_common::{Event, InfrastructureError, TypeInfo};
use tracing::{debug, error, info};

/// 事件发布结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// 事件类型
    pub event_type: TypeInfo,
    /// 成功处理的处理器数量
    pub delivered: usize,
    /// 处理失败的处理器
    pub failed: Vec<TypeInfo>,
}

impl PublishReport {
    fn new(event_type: TypeInfo) -> Self {
        Self {
            event_type,
            delivered: 0,
            failed: Vec::new(),
        }
    }

    /// 是否全部处理成功
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// 投递的处理器总数
    pub fn total(&self) -> usize {
        self.delivered + self.failed.len()
    }
}

/// 事件聚合器
pub struct EventAggregator<C = DiContainerImpl> {
    registry: EventHandlerRegistry<C>,
}

impl<C: DiContainer> EventAggregator<C> {
    /// 创建事件聚合器
    pub fn new(registry: EventHandlerRegistry<C>) -> Self {
        Self { registry }
    }

    /// 事件处理器注册表
    pub fn registry(&self) -> &EventHandlerRegistry<C> {
        &self.registry
    }

    /// 发布事件
    ///
    /// 处理器解析失败（重复处理器、依赖错误）会直接返回错误；
    /// 单个处理器返回错误时记录日志并继续投递。
    pub async fn publish<E: Event>(&self, event: &E) -> Result<PublishReport, InfrastructureError> {
        let event_type = TypeInfo::of::<E>();
        let handlers = self.registry.handlers_for::<E>()?;
        let mut report = PublishReport::new(event_type);

        for handler in handlers {
            let handler_type = handler.handler_type();
            match handler.handle(event).await {
                Ok(()) => {
                    debug!("事件已处理: {} -> {}", event_type, handler_type);
                    report.delivered += 1;
                }
                Err(e) => {
                    error!("事件处理失败: {} -> {}: {}", event_type, handler_type, e);
                    report.failed.push(handler_type);
                }
            }
        }

        info!(
            "发布事件 {}: {} 个处理器成功, {} 个失败",
            event_type.short_name(),
            report.delivered,
            report.failed.len()
        );
        Ok(report)
    }
}

impl<C> Clone for EventAggregator<C> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}
