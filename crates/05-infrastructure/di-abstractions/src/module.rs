//! 模块集合
//!
//! 模块是一组注册项的来源。加载可能失败，失败的模块由扫描器跳过并作为诊断信息报告。

use crate::registry::TypeRegistration;
use infrastructure_common::ModuleLoadError;
use std::fmt;
use std::sync::Arc;

/// 模块来源 trait
pub trait ModuleSource: Send + Sync {
    /// 模块名称
    fn name(&self) -> &str;

    /// 加载模块清单，返回按声明顺序排列的注册项
    fn load(&self) -> Result<Vec<TypeRegistration>, ModuleLoadError>;
}

/// 由静态清单函数定义的模块
#[derive(Clone, Copy)]
pub struct StaticModule {
    name: &'static str,
    manifest: fn() -> Vec<TypeRegistration>,
}

impl StaticModule {
    /// 创建静态模块
    pub const fn new(name: &'static str, manifest: fn() -> Vec<TypeRegistration>) -> Self {
        Self { name, manifest }
    }
}

impl ModuleSource for StaticModule {
    fn name(&self) -> &str {
        self.name
    }

    fn load(&self) -> Result<Vec<TypeRegistration>, ModuleLoadError> {
        Ok((self.manifest)())
    }
}

impl fmt::Debug for StaticModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticModule").field("name", &self.name).finish()
    }
}

/// 有序的模块集合
#[derive(Clone, Default)]
pub struct ModuleSet {
    modules: Vec<Arc<dyn ModuleSource>>,
}

impl ModuleSet {
    /// 创建空的模块集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加模块（链式）
    pub fn with_module(mut self, module: impl ModuleSource + 'static) -> Self {
        self.push(module);
        self
    }

    /// 追加模块
    pub fn push(&mut self, module: impl ModuleSource + 'static) {
        self.modules.push(Arc::new(module));
    }

    /// 模块数量
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// 按顺序遍历模块
    pub fn iter(&self) -> impl Iterator<Item = &dyn ModuleSource> {
        self.modules.iter().map(|module| module.as_ref())
    }

    /// 模块名称列表
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|module| module.name()).collect()
    }
}

impl fmt::Debug for ModuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSet")
            .field("modules", &self.names())
            .finish()
    }
}
