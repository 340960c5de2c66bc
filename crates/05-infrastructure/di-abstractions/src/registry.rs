//! 组件注册表抽象
//!
//! [`TypeRegistration`] 是清单中的一行：具体类型、构造策略、声明的依赖、
//! 实现的能力以及工厂函数。注册项在扫描阶段创建，之后不可变。

use crate::capability::{Capability, CapabilityBinding, CapabilityKey};
use crate::resolver::Resolver;
use infrastructure_common::{DependencyError, Event, Handle, Lifetime, TypeInfo};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 组件工厂函数类型
pub type ComponentFactoryFn = Arc<
    dyn Fn(&mut dyn Resolver) -> Result<Arc<dyn Any + Send + Sync>, DependencyError> + Send + Sync,
>;

/// 声明的依赖
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// 依赖类型
    pub type_info: TypeInfo,
    /// 是否为可选依赖
    pub optional: bool,
}

impl Dependency {
    /// 必需依赖
    pub fn required<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            optional: false,
        }
    }

    /// 可选依赖
    pub fn optional<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            optional: true,
        }
    }
}

/// 注册项
#[derive(Clone)]
pub struct TypeRegistration {
    /// 具体类型
    pub type_info: TypeInfo,
    /// 构造策略
    pub lifetime: Lifetime,
    /// 声明的依赖，按声明顺序
    pub dependencies: Vec<Dependency>,
    /// 实现的能力
    pub capabilities: Vec<CapabilityBinding>,
    /// 首次声明该类型的模块
    pub module: Option<String>,
    factory: ComponentFactoryFn,
}

impl TypeRegistration {
    /// 通过工厂创建实例
    pub fn create(
        &self,
        resolver: &mut dyn Resolver,
    ) -> Result<Arc<dyn Any + Send + Sync>, DependencyError> {
        (self.factory)(resolver)
    }

    /// 查找指定能力的绑定
    pub fn capability(&self, key: &CapabilityKey) -> Option<&CapabilityBinding> {
        self.capabilities.iter().find(|binding| &binding.key == key)
    }

    /// 是否实现指定能力
    pub fn provides(&self, key: &CapabilityKey) -> bool {
        self.capability(key).is_some()
    }

    /// 所有能力描述符
    pub fn capability_keys(&self) -> impl Iterator<Item = CapabilityKey> + '_ {
        self.capabilities.iter().map(|binding| binding.key)
    }

    /// 设置来源模块
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// 生成组件描述符
    pub fn descriptor(&self) -> ComponentDescriptor {
        ComponentDescriptor {
            type_info: self.type_info,
            lifetime: self.lifetime,
            dependencies: self.dependencies.clone(),
            capabilities: self.capability_keys().collect(),
            module: self.module.clone(),
        }
    }
}

impl fmt::Debug for TypeRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistration")
            .field("type_info", &self.type_info)
            .field("lifetime", &self.lifetime)
            .field("dependencies", &self.dependencies)
            .field("capabilities", &self.capabilities)
            .field("module", &self.module)
            .field("factory", &"<function>")
            .finish()
    }
}

/// 注册项构建器
pub struct RegistrationBuilder<T> {
    lifetime: Lifetime,
    dependencies: Vec<Dependency>,
    capabilities: Vec<CapabilityBinding>,
    factory: ComponentFactoryFn,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> RegistrationBuilder<T> {
    /// 使用工厂函数创建构建器，默认为瞬时策略
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&mut dyn Resolver) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        Self {
            lifetime: Lifetime::default(),
            dependencies: Vec::new(),
            capabilities: Vec::new(),
            factory: Arc::new(move |resolver: &mut dyn Resolver| {
                factory(resolver).map(|component| Arc::new(component) as Arc<dyn Any + Send + Sync>)
            }),
            _marker: PhantomData,
        }
    }

    /// 设置构造策略
    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// 单例策略
    pub fn singleton(self) -> Self {
        self.lifetime(Lifetime::Singleton)
    }

    /// 瞬时策略
    pub fn transient(self) -> Self {
        self.lifetime(Lifetime::Transient)
    }

    /// 声明必需依赖
    pub fn depends_on<D: ?Sized + 'static>(self) -> Self {
        self.dependency(Dependency::required::<D>())
    }

    /// 声明可选依赖
    pub fn optionally_depends_on<D: ?Sized + 'static>(self) -> Self {
        self.dependency(Dependency::optional::<D>())
    }

    /// 声明依赖
    pub fn dependency(mut self, dependency: Dependency) -> Self {
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
        self
    }

    /// 声明处理事件 `E`
    pub fn handles<E>(self) -> Self
    where
        E: Event,
        T: Handle<E>,
    {
        self.capability(CapabilityBinding::handler::<T, E>())
    }

    /// 声明提供能力 `C`
    pub fn provides<C: Capability + ?Sized>(self, upcast: fn(Arc<T>) -> Arc<C>) -> Self {
        self.capability(CapabilityBinding::new::<T, C>(upcast))
    }

    fn capability(mut self, binding: CapabilityBinding) -> Self {
        if !self.capabilities.iter().any(|existing| existing.key == binding.key) {
            self.capabilities.push(binding);
        }
        self
    }

    /// 构建注册项
    pub fn build(self) -> TypeRegistration {
        TypeRegistration {
            type_info: TypeInfo::of::<T>(),
            lifetime: self.lifetime,
            dependencies: self.dependencies,
            capabilities: self.capabilities,
            module: None,
            factory: self.factory,
        }
    }
}

impl<T: Default + Send + Sync + 'static> RegistrationBuilder<T> {
    /// 使用 `Default` 构造的构建器
    pub fn from_default() -> Self {
        Self::new(|_| Ok(T::default()))
    }
}

/// 可注册组件 trait
///
/// 通常由 `#[derive(Component)]` 生成。
pub trait RegisterableComponent: Send + Sync + 'static {
    /// 组件的注册项
    fn registration() -> TypeRegistration;
}

/// 组件描述符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// 组件类型
    pub type_info: TypeInfo,
    /// 构造策略
    pub lifetime: Lifetime,
    /// 声明的依赖
    pub dependencies: Vec<Dependency>,
    /// 实现的能力
    pub capabilities: Vec<CapabilityKey>,
    /// 来源模块
    pub module: Option<String>,
}
