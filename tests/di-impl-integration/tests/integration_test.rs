//! 组合流程集成测试：扫描 -> 注册 -> 校验 -> 解析 -> 发布

use di_abstractions::{
    CapabilityKey, CapabilityScanner, DiContainer, ModuleLoadError, ModuleSet, ModuleSource,
    RegistrationBuilder, StaticModule, TypeRegistration,
};
use di_impl::{DefaultCapabilityScanner, DiContainerImpl, EventAggregator, EventHandlerRegistry};
use infrastructure_common::{
    ApplicationStartedEvent, ComponentError, DependencyError, Handle, HandlerResult,
    StartupContext, TypeInfo,
};
use std::sync::Arc;

#[derive(Debug, Default)]
struct HandlerX;

#[derive(Debug, Default)]
struct HandlerY;

#[async_trait::async_trait]
impl Handle<ApplicationStartedEvent> for HandlerX {
    async fn handle(&self, _event: &ApplicationStartedEvent) -> HandlerResult {
        Ok(())
    }
}

#[async_trait::async_trait]
impl Handle<ApplicationStartedEvent> for HandlerY {
    async fn handle(&self, _event: &ApplicationStartedEvent) -> HandlerResult {
        Ok(())
    }
}

fn handler_x() -> TypeRegistration {
    RegistrationBuilder::<HandlerX>::from_default()
        .singleton()
        .handles::<ApplicationStartedEvent>()
        .build()
}

fn alpha_manifest() -> Vec<TypeRegistration> {
    vec![handler_x()]
}

fn beta_manifest() -> Vec<TypeRegistration> {
    vec![RegistrationBuilder::<HandlerY>::from_default()
        .transient()
        .handles::<ApplicationStartedEvent>()
        .build()]
}

/// 重新导出 alpha 中的处理器
fn gamma_manifest() -> Vec<TypeRegistration> {
    vec![handler_x()]
}

fn three_modules() -> ModuleSet {
    ModuleSet::new()
        .with_module(StaticModule::new("alpha", alpha_manifest))
        .with_module(StaticModule::new("beta", beta_manifest))
        .with_module(StaticModule::new("gamma", gamma_manifest))
}

fn compose(modules: &ModuleSet) -> DiContainerImpl {
    let report = DefaultCapabilityScanner::new().discover(modules).unwrap();
    let mut container = DiContainerImpl::new();
    for registration in report.registrations {
        container.register(registration).unwrap();
    }
    container
}

#[test]
fn test_reexported_handler_is_discovered_once() {
    let report = DefaultCapabilityScanner::new()
        .discover(&three_modules())
        .unwrap();

    let handlers = report.implementers_of(&CapabilityKey::handles::<ApplicationStartedEvent>());
    assert_eq!(handlers, vec![TypeInfo::of::<HandlerX>(), TypeInfo::of::<HandlerY>()]);
    assert!(!report.has_diagnostics());
}

#[test]
fn test_discovery_is_deterministic() {
    let first = compose(&three_modules());
    let second = compose(&three_modules());

    let key = CapabilityKey::handles::<ApplicationStartedEvent>();
    assert_eq!(first.implementers_of(&key), second.implementers_of(&key));
    assert_eq!(first.capability_keys(), second.capability_keys());
    assert_eq!(
        first.validate().unwrap(),
        second.validate().unwrap()
    );

    let handler_types = |container: &DiContainerImpl| -> Vec<TypeInfo> {
        container
            .build_all::<dyn Handle<ApplicationStartedEvent>>()
            .unwrap()
            .iter()
            .map(|handler| handler.handler_type())
            .collect()
    };
    let expected = vec![TypeInfo::of::<HandlerX>(), TypeInfo::of::<HandlerY>()];
    assert_eq!(handler_types(&first), expected);
    assert_eq!(handler_types(&first), expected);
    assert_eq!(handler_types(&second), expected);
}

#[tokio::test]
async fn test_registry_publishes_to_each_handler_once() {
    let container = Arc::new(compose(&three_modules()));
    let aggregator = EventAggregator::new(EventHandlerRegistry::new(container).unwrap());

    let report = aggregator.publish(&ApplicationStartedEvent).await.unwrap();
    assert_eq!(report.delivered, 2);
    assert_eq!(report.event_type, TypeInfo::of::<ApplicationStartedEvent>());
}

#[test]
fn test_singleton_identity_and_transient_freshness() {
    let container = compose(&three_modules());

    let x1 = container.build::<HandlerX>().unwrap();
    let x2 = container.build::<HandlerX>().unwrap();
    assert!(Arc::ptr_eq(&x1, &x2));

    let y1 = container.build::<HandlerY>().unwrap();
    let y2 = container.build::<HandlerY>().unwrap();
    assert!(!Arc::ptr_eq(&y1, &y2));
}

struct ServiceA {
    _b: Arc<ServiceB>,
}

struct ServiceB {
    _a: Arc<ServiceA>,
}

fn cyclic_manifest() -> Vec<TypeRegistration> {
    vec![
        RegistrationBuilder::new(|resolver| {
            Ok(ServiceA {
                _b: resolver.resolve::<ServiceB>()?,
            })
        })
        .singleton()
        .depends_on::<ServiceB>()
        .build(),
        RegistrationBuilder::new(|resolver| {
            Ok(ServiceB {
                _a: resolver.resolve::<ServiceA>()?,
            })
        })
        .singleton()
        .depends_on::<ServiceA>()
        .build(),
    ]
}

#[test]
fn test_cycle_is_reported_not_deadlocked() {
    let modules = ModuleSet::new().with_module(StaticModule::new("cyclic", cyclic_manifest));
    let container = compose(&modules);

    match container.validate() {
        Err(DependencyError::CircularDependency { dependency_chain }) => {
            assert!(dependency_chain.contains(TypeInfo::of::<ServiceA>().full_name));
            assert!(dependency_chain.contains(TypeInfo::of::<ServiceB>().full_name));
        }
        other => panic!("期望循环依赖错误, 实际: {other:?}"),
    }

    assert!(matches!(
        container.build::<ServiceA>(),
        Err(DependencyError::CircularDependency { .. })
    ));
}

trait Database: Send + Sync {
    fn name(&self) -> &str;
}

struct Postgres;

impl Database for Postgres {
    fn name(&self) -> &str {
        "postgres"
    }
}

struct StubDatabase;

impl Database for StubDatabase {
    fn name(&self) -> &str {
        "stub"
    }
}

struct Repository {
    database: Arc<Arc<dyn Database>>,
}

#[test]
fn test_constant_overrides_registration() {
    let mut container = DiContainerImpl::new();
    container
        .register(
            RegistrationBuilder::new(|_| Ok(Arc::new(Postgres) as Arc<dyn Database>))
                .singleton()
                .build(),
        )
        .unwrap();
    container
        .register(
            RegistrationBuilder::new(|resolver| {
                Ok(Repository {
                    database: resolver.resolve::<Arc<dyn Database>>()?,
                })
            })
            .transient()
            .depends_on::<Arc<dyn Database>>()
            .build(),
        )
        .unwrap();

    assert_eq!(container.build::<Repository>().unwrap().database.name(), "postgres");

    container.add_constant(Arc::new(Arc::new(StubDatabase) as Arc<dyn Database>));
    assert_eq!(container.build::<Repository>().unwrap().database.name(), "stub");
}

#[test]
fn test_startup_context_constant_is_shared() {
    let mut container = DiContainerImpl::new();
    container.add_constant(Arc::new(StartupContext::new(["first", "second"])));

    let first = container.build::<StartupContext>().unwrap();
    let second = container.build::<StartupContext>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.args(), ["first", "second"]);
}

fn conflicting_manifest() -> Vec<TypeRegistration> {
    vec![RegistrationBuilder::<HandlerX>::from_default()
        .transient()
        .handles::<ApplicationStartedEvent>()
        .build()]
}

#[test]
fn test_conflicting_lifetimes_fail_registration() {
    let modules = ModuleSet::new()
        .with_module(StaticModule::new("alpha", alpha_manifest))
        .with_module(StaticModule::new("conflicting", conflicting_manifest));
    let report = DefaultCapabilityScanner::new().discover(&modules).unwrap();

    let mut container = DiContainerImpl::new();
    let results: Vec<_> = report
        .registrations
        .into_iter()
        .map(|registration| container.register(registration))
        .collect();

    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(DependencyError::DuplicateRegistration { .. })
    ));
}

struct Broken;

impl ModuleSource for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn load(&self) -> Result<Vec<TypeRegistration>, ModuleLoadError> {
        Err(ModuleLoadError::new("broken", "清单格式错误"))
    }
}

#[test]
fn test_broken_module_is_skipped_with_diagnostic() {
    let modules = three_modules().with_module(Broken);
    let report = DefaultCapabilityScanner::new().discover(&modules).unwrap();

    assert_eq!(report.registrations.len(), 2);
    assert_eq!(report.diagnostics, vec![ModuleLoadError::new("broken", "清单格式错误")]);
}

#[derive(Debug, Default)]
struct Impostor;

#[async_trait::async_trait]
impl Handle<ApplicationStartedEvent> for Impostor {
    async fn handle(&self, _event: &ApplicationStartedEvent) -> HandlerResult {
        Ok(())
    }
}

fn impostor_manifest() -> Vec<TypeRegistration> {
    let mut impostor = RegistrationBuilder::<Impostor>::from_default()
        .handles::<ApplicationStartedEvent>()
        .build();
    impostor.type_info = TypeInfo::new(
        TypeInfo::of::<Impostor>().id,
        TypeInfo::of::<HandlerX>().full_name,
    );
    vec![impostor]
}

#[test]
fn test_same_named_handlers_are_rejected() {
    let modules = ModuleSet::new()
        .with_module(StaticModule::new("alpha", alpha_manifest))
        .with_module(StaticModule::new("impostor", impostor_manifest));
    let container = Arc::new(compose(&modules));

    match EventHandlerRegistry::new(container) {
        Err(ComponentError::DuplicateHandler { classes, .. }) => {
            assert_eq!(classes, vec![TypeInfo::of::<HandlerX>().full_name.to_string()]);
        }
        Err(other) => panic!("期望重复处理器错误, 实际: {other}"),
        Ok(_) => panic!("期望重复处理器错误"),
    }
}
