//! 组合根

use crate::builder::CompositionBuilder;
use di_abstractions::{Capability, DiContainer};
use di_impl::{DiContainerImpl, EventAggregator, EventHandlerRegistry, PublishReport};
use infrastructure_common::{
    ApplicationShutdownRequested, ApplicationStartedEvent, InfrastructureError, ModuleLoadError,
    StartupContext,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 组合根运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionStatus {
    /// 已组合
    Composed,
    /// 启动中
    Starting,
    /// 运行中
    Running,
    /// 已停止
    Stopped,
    /// 失败
    Failed,
}

/// 组合根
///
/// 持有构建完成的容器和事件处理器注册表，显式传递给需要解析能力的代码。
pub struct CompositionRoot {
    /// 依赖注入容器
    container: Arc<DiContainerImpl>,
    /// 事件聚合器
    events: EventAggregator,
    /// 加载失败的模块
    diagnostics: Vec<ModuleLoadError>,
    /// 启动上下文
    startup: Arc<StartupContext>,
    /// 运行状态
    status: RwLock<CompositionStatus>,
}

impl CompositionRoot {
    /// 创建组合构建器
    pub fn builder() -> CompositionBuilder {
        CompositionBuilder::new()
    }

    pub(crate) fn new(
        container: Arc<DiContainerImpl>,
        handlers: EventHandlerRegistry,
        diagnostics: Vec<ModuleLoadError>,
        startup: Arc<StartupContext>,
    ) -> Self {
        Self {
            container,
            events: EventAggregator::new(handlers),
            diagnostics,
            startup,
            status: RwLock::new(CompositionStatus::Composed),
        }
    }

    /// 启动应用：发布 [`ApplicationStartedEvent`]
    ///
    /// 状态检查与切换到 [`CompositionStatus::Starting`] 在同一次加锁内完成，并发的启动请求只有一个会投递事件。
    pub async fn start(&self) -> Result<PublishReport, InfrastructureError> {
        {
            let mut status = self.status.write();
            if matches!(
                *status,
                CompositionStatus::Starting | CompositionStatus::Running
            ) {
                warn!("重复启动请求被拒绝, 当前状态: {:?}", *status);
                return Err(InfrastructureError::BootstrapFailed {
                    message: "应用已启动".to_string(),
                });
            }
            *status = CompositionStatus::Starting;
        }

        info!("启动应用");
        match self.events.publish(&ApplicationStartedEvent).await {
            Ok(report) => {
                *self.status.write() = CompositionStatus::Running;
                info!("应用启动完成");
                Ok(report)
            }
            Err(e) => {
                *self.status.write() = CompositionStatus::Failed;
                error!("应用启动失败: {}", e);
                Err(e)
            }
        }
    }

    /// 关闭应用：发布 [`ApplicationShutdownRequested`]
    pub async fn shutdown(&self, restarting: bool) -> Result<PublishReport, InfrastructureError> {
        if self.status() != CompositionStatus::Running {
            warn!("应用未处于运行状态, 仍然发布关闭事件");
        }

        info!("关闭应用 (重启: {})", restarting);
        let report = self
            .events
            .publish(&ApplicationShutdownRequested::new(restarting))
            .await?;
        *self.status.write() = CompositionStatus::Stopped;
        info!("应用关闭完成");
        Ok(report)
    }

    /// 构造指定类型的实例
    pub fn build<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InfrastructureError> {
        Ok(self.container.build::<T>()?)
    }

    /// 构造实现指定能力的全部实例
    pub fn build_all<C: Capability + ?Sized>(&self) -> Result<Vec<Arc<C>>, InfrastructureError> {
        Ok(self.container.build_all::<C>()?)
    }

    /// 依赖注入容器
    pub fn container(&self) -> &Arc<DiContainerImpl> {
        &self.container
    }

    /// 事件处理器注册表
    pub fn handlers(&self) -> &EventHandlerRegistry {
        self.events.registry()
    }

    /// 事件聚合器
    pub fn events(&self) -> &EventAggregator {
        &self.events
    }

    /// 加载失败的模块
    pub fn diagnostics(&self) -> &[ModuleLoadError] {
        &self.diagnostics
    }

    /// 启动上下文
    pub fn startup(&self) -> &StartupContext {
        &self.startup
    }

    /// 运行状态
    pub fn status(&self) -> CompositionStatus {
        *self.status.read()
    }
}
