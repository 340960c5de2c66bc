//! 依赖注入容器实现

use crate::guard::{BuildCoordinator, Claim};
use dashmap::DashMap;
use di_abstractions::{
    Capability, CapabilityKey, ComponentDescriptor, DependencyGraph, DiContainer, ResolveContext,
    Resolver, TypeRegistration,
};
use infrastructure_common::{DependencyError, Lifetime, TypeInfo};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

type Instance = Arc<dyn Any + Send + Sync>;

/// 具体的依赖注入容器实现
///
/// 注册项在注册阶段写入后只读。单例的首次构造由 [`BuildCoordinator`] 按类型互斥：
/// 只有一个线程执行工厂，其余线程等待同一实例；会形成跨线程等待环的请求直接报告循环依赖。
#[derive(Default)]
pub struct DiContainerImpl {
    /// 组件注册信息
    registrations: HashMap<TypeId, TypeRegistration>,
    /// 注册顺序
    order: Vec<TypeId>,
    /// 常量实例
    constants: HashMap<TypeId, Instance>,
    /// 单例缓存
    instances: DashMap<TypeId, Instance>,
    /// 单例构造协调
    building: BuildCoordinator,
    /// 能力发现结果缓存
    capability_cache: DashMap<CapabilityKey, Arc<Vec<TypeId>>>,
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册项数量
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// 是否没有任何注册项
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 已构造的单例数量
    pub fn singleton_count(&self) -> usize {
        self.instances.len()
    }

    /// 当前注册项与常量组成的依赖图
    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::from_registrations(self.registrations_in_order())
            .with_constants(self.constants.keys().copied())
    }

    /// 按拓扑顺序构造全部单例，返回本次构造的数量
    pub fn initialize_singletons(&self) -> Result<usize, DependencyError> {
        let order = self.validate()?;
        let mut created = 0;
        for type_info in order {
            let Some(registration) = self.registrations.get(&type_info.id) else {
                continue;
            };
            if !registration.lifetime.is_singleton() || self.is_cached(type_info.id) {
                continue;
            }
            self.build_any(type_info)?;
            created += 1;
        }
        info!("预先构造单例完成: {} 个", created);
        Ok(created)
    }

    fn registrations_in_order(&self) -> impl Iterator<Item = &TypeRegistration> + '_ {
        self.order
            .iter()
            .filter_map(|type_id| self.registrations.get(type_id))
    }

    fn is_cached(&self, type_id: TypeId) -> bool {
        self.instances.contains_key(&type_id)
    }

    fn implementer_ids(&self, key: &CapabilityKey) -> Arc<Vec<TypeId>> {
        if let Some(cached) = self.capability_cache.get(key) {
            return Arc::clone(cached.value());
        }

        let ids: Arc<Vec<TypeId>> = Arc::new(
            self.registrations_in_order()
                .filter(|registration| registration.provides(key))
                .map(|registration| registration.type_info.id)
                .collect(),
        );
        debug!("发现能力 {} 的实现: {} 个", key, ids.len());
        self.capability_cache.insert(*key, Arc::clone(&ids));
        ids
    }

    fn resolve_in(
        &self,
        type_info: TypeInfo,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        if let Some(constant) = self.constants.get(&type_info.id) {
            return Ok(Arc::clone(constant));
        }

        let registration = self.registrations.get(&type_info.id).ok_or_else(|| {
            DependencyError::UnresolvableDependency {
                type_name: type_info.full_name.to_string(),
                required_by: context.current().map(|t| t.full_name.to_string()),
            }
        })?;

        context.push_type(type_info)?;
        let result = match registration.lifetime {
            Lifetime::Singleton => self.resolve_singleton(registration, context),
            Lifetime::Transient => self.construct(registration, context),
        };
        context.pop_type();
        result
    }

    fn cached(&self, type_id: TypeId) -> Option<Instance> {
        self.instances.get(&type_id).map(|entry| Arc::clone(entry.value()))
    }

    fn resolve_singleton(
        &self,
        registration: &TypeRegistration,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        let type_id = registration.type_info.id;
        if let Some(instance) = self.cached(type_id) {
            return Ok(instance);
        }

        match self
            .building
            .claim(registration.type_info, || self.cached(type_id))?
        {
            Claim::Ready(instance) => Ok(instance),
            Claim::Owned(slot) => {
                let instance = self.construct(registration, context)?;
                self.instances.insert(type_id, Arc::clone(&instance));
                drop(slot);
                Ok(instance)
            }
        }
    }

    fn construct(
        &self,
        registration: &TypeRegistration,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        debug!(
            "创建组件实例: {} ({})",
            registration.type_info, registration.lifetime
        );
        let mut resolver = ContextResolver {
            container: self,
            context,
        };
        registration.create(&mut resolver)
    }
}

impl DiContainer for DiContainerImpl {
    fn register(&mut self, registration: TypeRegistration) -> Result<(), DependencyError> {
        let type_id = registration.type_info.id;

        if let Some(existing) = self.registrations.get(&type_id) {
            if existing.lifetime == registration.lifetime {
                debug!("忽略相同的重复注册: {}", registration.type_info);
                return Ok(());
            }
            return Err(DependencyError::DuplicateRegistration {
                type_name: registration.type_info.full_name.to_string(),
                existing: existing.lifetime.to_string(),
                requested: registration.lifetime.to_string(),
            });
        }

        debug!(
            "注册组件: {} ({})",
            registration.type_info, registration.lifetime
        );
        self.order.push(type_id);
        self.registrations.insert(type_id, registration);
        self.capability_cache.clear();
        Ok(())
    }

    fn add_constant<T: Send + Sync + 'static>(&mut self, value: Arc<T>) {
        let type_info = TypeInfo::of::<T>();
        debug!("注册常量: {}", type_info);
        self.instances.remove(&type_info.id);
        self.constants.insert(type_info.id, value);
    }

    fn build_any(&self, type_info: TypeInfo) -> Result<Instance, DependencyError> {
        let mut context = ResolveContext::new();
        self.resolve_in(type_info, &mut context)
    }

    fn build_all<C: Capability + ?Sized>(&self) -> Result<Vec<Arc<C>>, DependencyError> {
        let key = C::key();
        let ids = self.implementer_ids(&key);
        let mut instances = Vec::with_capacity(ids.len());

        for type_id in ids.iter() {
            let Some(registration) = self.registrations.get(type_id) else {
                continue;
            };
            let instance = self.build_any(registration.type_info)?;
            let view = registration
                .capability(&key)
                .and_then(|binding| binding.cast::<C>(instance))
                .ok_or_else(|| DependencyError::TypeMismatch {
                    type_name: registration.type_info.full_name.to_string(),
                })?;
            instances.push(view);
        }

        Ok(instances)
    }

    fn is_registered_type(&self, type_info: TypeInfo) -> bool {
        self.constants.contains_key(&type_info.id) || self.registrations.contains_key(&type_info.id)
    }

    fn implementers_of(&self, key: &CapabilityKey) -> Vec<TypeInfo> {
        self.implementer_ids(key)
            .iter()
            .filter_map(|type_id| self.registrations.get(type_id))
            .map(|registration| registration.type_info)
            .collect()
    }

    fn capability_keys(&self) -> Vec<CapabilityKey> {
        let mut keys: Vec<CapabilityKey> = Vec::new();
        for key in self
            .registrations_in_order()
            .flat_map(|registration| registration.capability_keys())
        {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    fn registered_components(&self) -> Vec<ComponentDescriptor> {
        self.registrations_in_order()
            .map(TypeRegistration::descriptor)
            .collect()
    }

    fn validate(&self) -> Result<Vec<TypeInfo>, DependencyError> {
        let graph = self.dependency_graph();
        graph.validate()?;
        graph.topological_order()
    }
}

/// 在单次顶层构造中传递解析上下文的解析器
struct ContextResolver<'a> {
    container: &'a DiContainerImpl,
    context: &'a mut ResolveContext,
}

impl Resolver for ContextResolver<'_> {
    fn resolve_any(&mut self, type_info: TypeInfo) -> Result<Instance, DependencyError> {
        self.container.resolve_in(type_info, self.context)
    }

    fn can_resolve(&self, type_info: TypeInfo) -> bool {
        self.container.is_registered_type(type_info)
    }
}
