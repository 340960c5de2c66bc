//! 事件处理器注册表

use crate::container::DiContainerImpl;
use di_abstractions::{CapabilityKey, DiContainer, HANDLE_CONTRACT};
use infrastructure_common::{ComponentError, Event, Handle, InfrastructureError, TypeInfo};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 事件处理器注册表
///
/// 按事件类型查询全部处理器，并保证同一事件类型下处理器类（完整限定名称）不重复。
pub struct EventHandlerRegistry<C = DiContainerImpl> {
    container: Arc<C>,
}

impl<C: DiContainer> EventHandlerRegistry<C> {
    /// 创建注册表，并立即校验所有事件类型的处理器唯一性
    pub fn new(container: Arc<C>) -> Result<Self, ComponentError> {
        let registry = Self::unchecked(container);
        registry.verify_all()?;
        info!(
            "事件处理器注册表已就绪: {} 个事件类型",
            registry.event_types().len()
        );
        Ok(registry)
    }

    /// 创建注册表，不做唯一性校验
    pub fn unchecked(container: Arc<C>) -> Self {
        Self { container }
    }

    /// 底层容器
    pub fn container(&self) -> &Arc<C> {
        &self.container
    }

    /// 获取事件 `E` 的全部处理器，按注册顺序排列
    pub fn handlers_for<E: Event>(&self) -> Result<Vec<Arc<dyn Handle<E>>>, InfrastructureError> {
        self.assert_unique::<E>()?;
        let handlers = self.container.build_all::<dyn Handle<E>>()?;
        check_unique(
            TypeInfo::of::<E>(),
            handlers.iter().map(|handler| handler.handler_type()),
        )?;
        debug!(
            "解析事件处理器: {} -> {} 个",
            TypeInfo::of::<E>(),
            handlers.len()
        );
        Ok(handlers)
    }

    /// 断言事件 `E` 的处理器类不重复
    pub fn assert_unique<E: Event>(&self) -> Result<(), ComponentError> {
        self.assert_unique_key(&CapabilityKey::handles::<E>())
    }

    /// 断言指定封闭能力的实现类不重复
    pub fn assert_unique_key(&self, key: &CapabilityKey) -> Result<(), ComponentError> {
        check_unique(key.subject, self.container.implementers_of(key).into_iter())
    }

    /// 对所有事件类型执行唯一性断言
    pub fn verify_all(&self) -> Result<(), ComponentError> {
        for key in self.handler_keys() {
            self.assert_unique_key(&key)?;
        }
        Ok(())
    }

    /// 至少有一个处理器的事件类型
    pub fn event_types(&self) -> Vec<TypeInfo> {
        self.handler_keys().into_iter().map(|key| key.subject).collect()
    }

    /// 事件 `E` 的处理器类型，按注册顺序排列
    pub fn handler_types<E: Event>(&self) -> Vec<TypeInfo> {
        self.container
            .implementers_of(&CapabilityKey::handles::<E>())
    }

    fn handler_keys(&self) -> Vec<CapabilityKey> {
        self.container
            .capability_keys()
            .into_iter()
            .filter(|key| key.is_instance_of(HANDLE_CONTRACT))
            .collect()
    }
}

impl<C> Clone for EventHandlerRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            container: Arc::clone(&self.container),
        }
    }
}

/// 按完整限定名称检查处理器类是否重复
fn check_unique(
    event_type: TypeInfo,
    classes: impl Iterator<Item = TypeInfo>,
) -> Result<(), ComponentError> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for class in classes {
        *counts.entry(class.full_name).or_default() += 1;
    }

    let duplicates: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect();

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(ComponentError::DuplicateHandler {
            event_type: event_type.full_name.to_string(),
            classes: duplicates,
        })
    }
}
