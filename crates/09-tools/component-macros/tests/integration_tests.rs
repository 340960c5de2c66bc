//! 组件宏集成测试

use component_macros::Component;
use di_abstractions::{
    CapabilityKey, Dependency, Lifetime, RegisterableComponent, Resolver,
};
use infrastructure_common::{
    ApplicationShutdownRequested, ApplicationStartedEvent, DependencyError, Handle,
    HandlerResult, TypeInfo,
};
use std::any::Any;
use std::sync::Arc;

/// 测试数据库
#[derive(Debug, Default)]
pub struct Database {
    name: &'static str,
}

/// 测试缓存
#[derive(Debug, Default)]
pub struct Cache;

/// 测试处理器
#[derive(Component)]
#[component(transient, handles(ApplicationStartedEvent, ApplicationShutdownRequested))]
pub struct LifecycleAuditor {
    database: Arc<Database>,
    cache: Option<Arc<Cache>>,
    audited: u32,
}

#[async_trait::async_trait]
impl Handle<ApplicationStartedEvent> for LifecycleAuditor {
    async fn handle(&self, _event: &ApplicationStartedEvent) -> HandlerResult {
        Ok(())
    }
}

#[async_trait::async_trait]
impl Handle<ApplicationShutdownRequested> for LifecycleAuditor {
    async fn handle(&self, _event: &ApplicationShutdownRequested) -> HandlerResult {
        Ok(())
    }
}

/// 默认单例组件
#[derive(Component, Default)]
pub struct Clock;

/// 元组结构体组件
#[derive(Component)]
#[component(singleton)]
pub struct Mailer(Arc<Database>);

/// 只提供数据库的解析器
struct DatabaseOnly;

impl Resolver for DatabaseOnly {
    fn resolve_any(
        &mut self,
        type_info: TypeInfo,
    ) -> Result<Arc<dyn Any + Send + Sync>, DependencyError> {
        if type_info.is::<Database>() {
            Ok(Arc::new(Database { name: "primary" }))
        } else {
            Err(DependencyError::UnresolvableDependency {
                type_name: type_info.full_name.to_string(),
                required_by: None,
            })
        }
    }

    fn can_resolve(&self, type_info: TypeInfo) -> bool {
        type_info.is::<Database>()
    }
}

#[test]
fn test_field_types_become_dependencies() {
    let registration = LifecycleAuditor::registration();

    assert!(registration.type_info.is::<LifecycleAuditor>());
    assert_eq!(registration.lifetime, Lifetime::Transient);
    assert_eq!(
        registration.dependencies,
        vec![Dependency::required::<Database>(), Dependency::optional::<Cache>()]
    );
    assert_eq!(
        registration.capability_keys().collect::<Vec<_>>(),
        vec![
            CapabilityKey::handles::<ApplicationStartedEvent>(),
            CapabilityKey::handles::<ApplicationShutdownRequested>(),
        ]
    );
}

#[test]
fn test_generated_factory_resolves_fields() {
    let instance = LifecycleAuditor::registration()
        .create(&mut DatabaseOnly)
        .unwrap()
        .downcast::<LifecycleAuditor>()
        .unwrap();

    assert_eq!(instance.database.name, "primary");
    assert!(instance.cache.is_none());
    assert_eq!(instance.audited, 0);
}

#[test]
fn test_defaults_to_singleton_without_dependencies() {
    let registration = Clock::registration();
    assert_eq!(registration.lifetime, Lifetime::Singleton);
    assert!(registration.dependencies.is_empty());
    assert!(registration.capabilities.is_empty());
}

#[test]
fn test_tuple_struct_fields() {
    let registration = Mailer::registration();
    assert_eq!(registration.dependencies, vec![Dependency::required::<Database>()]);

    let mailer = registration
        .create(&mut DatabaseOnly)
        .unwrap()
        .downcast::<Mailer>()
        .unwrap();
    assert_eq!(mailer.0.name, "primary");
}

#[tokio::test]
async fn test_generated_capability_casts_to_handler() {
    let registration = LifecycleAuditor::registration();
    let instance = registration.create(&mut DatabaseOnly).unwrap();

    let handler = registration
        .capability(&CapabilityKey::handles::<ApplicationStartedEvent>())
        .and_then(|binding| binding.cast::<dyn Handle<ApplicationStartedEvent>>(instance))
        .unwrap();
    handler.handle(&ApplicationStartedEvent).await.unwrap();
}
