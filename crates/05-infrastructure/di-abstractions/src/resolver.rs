//! 组件解析器抽象接口
//!
//! 工厂函数通过 [`Resolver`] 获取自身依赖；[`ResolveContext`] 记录当前调用栈上
//! 正在解析的类型，用于快速发现循环依赖。

use infrastructure_common::{DependencyError, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// 组件解析器 trait
///
/// 类型化的 `resolve` / `try_resolve` 定义在 `dyn Resolver` 上。
pub trait Resolver {
    /// 解析指定类型的实例
    fn resolve_any(&mut self, type_info: TypeInfo) -> Result<Arc<dyn Any + Send + Sync>, DependencyError>;

    /// 检查是否可以解析指定类型（已注册或存在常量）
    fn can_resolve(&self, type_info: TypeInfo) -> bool;
}

impl dyn Resolver + '_ {
    /// 解析指定类型的组件
    pub fn resolve<T: Send + Sync + 'static>(&mut self) -> Result<Arc<T>, DependencyError> {
        let type_info = TypeInfo::of::<T>();
        self.resolve_any(type_info)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                type_name: type_info.full_name.to_string(),
            })
    }

    /// 解析可选依赖，类型不可解析时返回 `None`
    pub fn try_resolve<T: Send + Sync + 'static>(&mut self) -> Result<Option<Arc<T>>, DependencyError> {
        if self.can_resolve(TypeInfo::of::<T>()) {
            self.resolve::<T>().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// 解析上下文
///
/// 每次顶层 `build` 调用持有一个上下文。
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    resolution_chain: Vec<TypeInfo>,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, type_info: TypeInfo) -> Result<(), DependencyError> {
        if let Some(start) = self.resolution_chain.iter().position(|t| t.id == type_info.id) {
            let chain = self.resolution_chain[start..]
                .iter()
                .chain(std::iter::once(&type_info))
                .map(|t| t.full_name)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DependencyError::CircularDependency {
                dependency_chain: chain,
            });
        }
        self.resolution_chain.push(type_info);
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前正在解析的类型
    pub fn current(&self) -> Option<TypeInfo> {
        self.resolution_chain.last().copied()
    }

    /// 解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn test_push_pop_tracks_current() {
        let mut context = ResolveContext::new();
        context.push_type(TypeInfo::of::<A>()).unwrap();
        context.push_type(TypeInfo::of::<B>()).unwrap();
        assert_eq!(context.current(), Some(TypeInfo::of::<B>()));
        assert_eq!(context.depth(), 2);
        context.pop_type();
        assert_eq!(context.current(), Some(TypeInfo::of::<A>()));
    }

    #[test]
    fn test_reentering_type_reports_cycle_chain() {
        let mut context = ResolveContext::new();
        context.push_type(TypeInfo::of::<A>()).unwrap();
        context.push_type(TypeInfo::of::<B>()).unwrap();

        let error = context.push_type(TypeInfo::of::<A>()).unwrap_err();
        match error {
            DependencyError::CircularDependency { dependency_chain } => {
                let parts: Vec<_> = dependency_chain.split(" -> ").collect();
                assert_eq!(parts.len(), 3);
                assert!(parts[0].ends_with("::A"));
                assert!(parts[1].ends_with("::B"));
                assert!(parts[2].ends_with("::A"));
            }
            other => panic!("期望循环依赖错误, 实际: {other}"),
        }
        assert_eq!(context.depth(), 2);
    }
}
