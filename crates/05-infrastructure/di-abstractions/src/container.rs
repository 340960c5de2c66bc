//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::capability::{Capability, CapabilityKey};
use crate::registry::{ComponentDescriptor, TypeRegistration};
use infrastructure_common::{DependencyError, TypeInfo};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;

/// 依赖注入容器 trait
///
/// 注册阶段通过 `&mut self` 写入注册项，之后所有解析操作只需要 `&self`，
/// 可以在多个线程间共享。
pub trait DiContainer: Send + Sync {
    /// 注册组件
    ///
    /// 同一类型以相同策略重复注册是幂等的；策略冲突时返回
    /// [`DependencyError::DuplicateRegistration`]。
    fn register(&mut self, registration: TypeRegistration) -> Result<(), DependencyError>;

    /// 添加常量实例，之后所有需要该类型的构造都直接获得此实例
    fn add_constant<T: Send + Sync + 'static>(&mut self, value: Arc<T>)
    where
        Self: Sized;

    /// 构造指定类型的实例
    fn build_any(&self, type_info: TypeInfo) -> Result<Arc<dyn Any + Send + Sync>, DependencyError>;

    /// 构造指定类型的实例
    fn build<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, DependencyError>
    where
        Self: Sized,
    {
        let type_info = TypeInfo::of::<T>();
        self.build_any(type_info)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                type_name: type_info.full_name.to_string(),
            })
    }

    /// 构造实现指定能力的全部实例，按注册顺序排列
    fn build_all<C: Capability + ?Sized>(&self) -> Result<Vec<Arc<C>>, DependencyError>
    where
        Self: Sized;

    /// 检查类型是否已注册或存在常量
    fn is_registered_type(&self, type_info: TypeInfo) -> bool;

    /// 检查类型是否已注册或存在常量
    fn is_registered<T: ?Sized + 'static>(&self) -> bool
    where
        Self: Sized,
    {
        self.is_registered_type(TypeInfo::of::<T>())
    }

    /// 实现指定封闭能力的类型，按注册顺序排列
    fn implementers_of(&self, key: &CapabilityKey) -> Vec<TypeInfo>;

    /// 所有已注册的能力描述符，按首次出现顺序排列
    fn capability_keys(&self) -> Vec<CapabilityKey>;

    /// 所有已注册组件的描述符，按注册顺序排列
    fn registered_components(&self) -> Vec<ComponentDescriptor>;

    /// 静态校验依赖图，返回拓扑构造顺序
    fn validate(&self) -> Result<Vec<TypeInfo>, DependencyError>;
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 构建时是否静态校验依赖图
    pub validate_on_build: bool,
    /// 构建时是否按拓扑顺序预先构造所有单例
    pub eager_singletons: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            validate_on_build: true,
            eager_singletons: false,
        }
    }
}

impl ContainerConfig {
    /// 开发环境配置
    pub fn development() -> Self {
        Self::default()
    }

    /// 生产环境配置：启动时构造全部单例，尽早暴露构造错误
    pub fn production() -> Self {
        Self {
            validate_on_build: true,
            eager_singletons: true,
        }
    }
}
