//! 组件生命周期定义

use std::fmt;

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// 单例模式 - 整个进程生命周期内只创建一个实例
    Singleton,
    /// 瞬时模式 - 每次解析都创建新实例
    #[default]
    Transient,
}

impl Lifetime {
    /// 是否为单例
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Singleton)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleton => f.write_str("singleton"),
            Self::Transient => f.write_str("transient"),
        }
    }
}
