//! 能力描述符
//!
//! 开放的泛型契约（例如 `Handle<E>`）被建模为 `(契约名称, 主体类型)` 二元组，
//! 作为扫描器和容器 "构建全部" 查询的键。

use infrastructure_common::{Event, Handle, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 事件处理器契约名称
pub const HANDLE_CONTRACT: &str = "Handle";

/// 封闭的能力描述符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityKey {
    /// 契约名称（开放泛型形状）
    pub contract: &'static str,
    /// 主体类型（泛型实参）
    pub subject: TypeInfo,
}

impl CapabilityKey {
    /// 创建能力描述符
    pub const fn new(contract: &'static str, subject: TypeInfo) -> Self {
        Self { contract, subject }
    }

    /// 事件处理器能力描述符
    pub fn handles<E: Event>() -> Self {
        Self::new(HANDLE_CONTRACT, TypeInfo::of::<E>())
    }

    /// 是否为指定契约的实例化
    pub fn is_instance_of(&self, contract: &str) -> bool {
        self.contract == contract
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.contract, self.subject)
    }
}

/// 能力 trait
///
/// 为能力的 trait object 类型实现，例如 `dyn Handle<E>`。
pub trait Capability: Send + Sync + 'static {
    /// 能力描述符
    fn key() -> CapabilityKey;
}

impl<E: Event> Capability for dyn Handle<E> {
    fn key() -> CapabilityKey {
        CapabilityKey::handles::<E>()
    }
}

type CastFn =
    Arc<dyn Fn(Arc<dyn Any + Send + Sync>) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// 具体类型到能力视图的绑定
#[derive(Clone)]
pub struct CapabilityBinding {
    /// 能力描述符
    pub key: CapabilityKey,
    cast: CastFn,
}

impl CapabilityBinding {
    /// 创建绑定，`upcast` 负责把具体实例转换为能力视图
    pub fn new<T, C>(upcast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        T: Send + Sync + 'static,
        C: Capability + ?Sized,
    {
        Self {
            key: C::key(),
            cast: Arc::new(move |instance: Arc<dyn Any + Send + Sync>| {
                instance
                    .downcast::<T>()
                    .ok()
                    .map(|typed| Box::new(upcast(typed)) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    /// 事件处理器绑定
    pub fn handler<T, E>() -> Self
    where
        T: Handle<E>,
        E: Event,
    {
        Self::new::<T, dyn Handle<E>>(upcast_handler::<T, E>)
    }

    /// 将实例转换为能力视图，类型不符时返回 `None`
    pub fn cast<C: Capability + ?Sized>(
        &self,
        instance: Arc<dyn Any + Send + Sync>,
    ) -> Option<Arc<C>> {
        if self.key != C::key() {
            return None;
        }
        (self.cast)(instance)?
            .downcast::<Arc<C>>()
            .ok()
            .map(|boxed| *boxed)
    }
}

impl fmt::Debug for CapabilityBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityBinding")
            .field("key", &self.key)
            .field("cast", &"<function>")
            .finish()
    }
}

fn upcast_handler<T: Handle<E>, E: Event>(handler: Arc<T>) -> Arc<dyn Handle<E>> {
    handler
}
