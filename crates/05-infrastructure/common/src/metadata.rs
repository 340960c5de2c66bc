//! 元数据定义
//!
//! 提供组件类型的身份信息

use std::any::TypeId;
use std::fmt;

/// 类型信息
///
/// 类型身份以 `TypeId` 为准，`full_name` 为完整限定路径（`std::any::type_name`），
/// 用于诊断输出和按类名的唯一性校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型ID
    pub id: TypeId,
    /// 完整限定类型名称
    pub full_name: &'static str,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub const fn new(id: TypeId, full_name: &'static str) -> Self {
        Self { id, full_name }
    }

    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            full_name: std::any::type_name::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    ///
    /// 泛型参数保持原样，例如 `app::Handler<app::Event>` 得到 `Handler<app::Event>`。
    pub fn short_name(&self) -> &'static str {
        let head_end = self.full_name.find('<').unwrap_or(self.full_name.len());
        let head = &self.full_name[..head_end];
        match head.rfind("::") {
            Some(index) => &self.full_name[index + 2..],
            None => self.full_name,
        }
    }

    /// 检查是否为指定类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name)
    }
}
