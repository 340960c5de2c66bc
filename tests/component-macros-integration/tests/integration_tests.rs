//! 派生组件在容器中的集成测试

use component_macros::Component;
use di_abstractions::{DiContainer, RegisterableComponent};
use di_impl::{DiContainerImpl, EventAggregator, EventHandlerRegistry};
use infrastructure_common::{
    ApplicationShutdownRequested, ApplicationStartedEvent, Handle, HandlerResult, StartupContext,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 计数器
#[derive(Debug, Default, Component)]
pub struct Counter {
    hits: AtomicUsize,
}

/// 读取启动参数的处理器
#[derive(Component)]
#[component(handles(ApplicationStartedEvent, ApplicationShutdownRequested))]
pub struct StartupAuditor {
    startup: Arc<StartupContext>,
    counter: Arc<Counter>,
}

#[async_trait::async_trait]
impl Handle<ApplicationStartedEvent> for StartupAuditor {
    async fn handle(&self, _event: &ApplicationStartedEvent) -> HandlerResult {
        if self.startup.is_restart() {
            return Err("重启后不再计数".into());
        }
        self.counter.hits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Handle<ApplicationShutdownRequested> for StartupAuditor {
    async fn handle(&self, _event: &ApplicationShutdownRequested) -> HandlerResult {
        self.counter.hits.fetch_add(10, Ordering::SeqCst);
        Ok(())
    }
}

/// 瞬态处理器
#[derive(Component)]
#[component(transient, handles(ApplicationStartedEvent))]
pub struct TransientGreeter {
    counter: Arc<Counter>,
    greeted: usize,
}

#[async_trait::async_trait]
impl Handle<ApplicationStartedEvent> for TransientGreeter {
    async fn handle(&self, _event: &ApplicationStartedEvent) -> HandlerResult {
        self.counter.hits.fetch_add(100 + self.greeted, Ordering::SeqCst);
        Ok(())
    }
}

fn container(args: &[&str]) -> DiContainerImpl {
    let mut container = DiContainerImpl::new();
    container.register(Counter::registration()).unwrap();
    container.register(StartupAuditor::registration()).unwrap();
    container.register(TransientGreeter::registration()).unwrap();
    container.add_constant(Arc::new(StartupContext::new(args.iter().copied())));
    container
}

#[test]
fn test_derived_components_validate() {
    let order = container(&[]).validate().unwrap();
    let counter = order.iter().position(|t| t.is::<Counter>()).unwrap();
    let auditor = order.iter().position(|t| t.is::<StartupAuditor>()).unwrap();
    assert!(counter < auditor);
    assert!(!order.iter().any(|t| t.is::<StartupContext>()));
}

#[test]
fn test_derived_component_receives_startup_context() {
    let container = container(&["-data=/srv/app", "-restart"]);
    let auditor = container.build::<StartupAuditor>().unwrap();

    assert!(auditor.startup.is_restart());
    assert_eq!(auditor.startup.app_data_override(), Some("/srv/app"));
    assert!(Arc::ptr_eq(&auditor.counter, &container.build::<Counter>().unwrap()));
}

#[tokio::test]
async fn test_derived_handlers_are_published() {
    let container = Arc::new(container(&[]));
    let registry = EventHandlerRegistry::new(Arc::clone(&container)).unwrap();
    let aggregator = EventAggregator::new(registry);

    let started = aggregator.publish(&ApplicationStartedEvent).await.unwrap();
    assert_eq!(started.delivered, 2);
    assert!(started.is_success());

    let stopped = aggregator
        .publish(&ApplicationShutdownRequested::new(false))
        .await
        .unwrap();
    assert_eq!(stopped.delivered, 1);

    let counter = container.build::<Counter>().unwrap();
    assert_eq!(counter.hits.load(Ordering::SeqCst), 111);
}

#[tokio::test]
async fn test_handler_failure_is_reported() {
    let registry = EventHandlerRegistry::new(Arc::new(container(&["-restart"]))).unwrap();
    let report = EventAggregator::new(registry)
        .publish(&ApplicationStartedEvent)
        .await
        .unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].is::<StartupAuditor>());
}
