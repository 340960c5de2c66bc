//! 演示模块

use component_macros::Component;
use di_abstractions::{RegisterableComponent, TypeRegistration};
use infrastructure_common::{
    ApplicationShutdownRequested, ApplicationStartedEvent, Handle, HandlerResult, StartupContext,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// 运行时统计
#[derive(Debug, Default, Component)]
pub struct Uptime {
    events: AtomicU64,
}

impl Uptime {
    /// 记录一次事件
    pub fn tick(&self) -> u64 {
        self.events.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// 启动横幅
#[derive(Component)]
#[component(handles(ApplicationStartedEvent))]
pub struct StartupBanner {
    startup: Arc<StartupContext>,
    uptime: Arc<Uptime>,
}

#[async_trait::async_trait]
impl Handle<ApplicationStartedEvent> for StartupBanner {
    async fn handle(&self, _event: &ApplicationStartedEvent) -> HandlerResult {
        self.uptime.tick();
        match self.startup.app_data_override() {
            Some(data) => info!("应用已启动, 数据目录: {}", data),
            None => info!("应用已启动, 使用默认数据目录"),
        }
        if self.startup.is_restart() {
            info!("本次为重启后的启动");
        }
        Ok(())
    }
}

/// 关闭通知
#[derive(Component)]
#[component(transient, handles(ApplicationShutdownRequested))]
pub struct ShutdownNotice {
    startup: Arc<StartupContext>,
    uptime: Option<Arc<Uptime>>,
}

#[async_trait::async_trait]
impl Handle<ApplicationShutdownRequested> for ShutdownNotice {
    async fn handle(&self, event: &ApplicationShutdownRequested) -> HandlerResult {
        let events = self.uptime.as_ref().map_or(0, |uptime| uptime.tick());
        if event.restarting {
            info!(
                "应用即将重启, 保留参数: [{}]",
                self.startup.preserved_arguments()
            );
        } else {
            info!("应用正在关闭, 共处理 {} 个生命周期事件", events);
        }
        Ok(())
    }
}

/// 核心模块清单
pub fn core_manifest() -> Vec<TypeRegistration> {
    vec![Uptime::registration(), StartupBanner::registration()]
}

/// 生命周期模块清单
pub fn lifecycle_manifest() -> Vec<TypeRegistration> {
    vec![ShutdownNotice::registration()]
}
