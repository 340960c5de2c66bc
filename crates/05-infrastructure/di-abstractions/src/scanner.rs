//! 能力扫描器抽象接口
//!
//! 扫描器遍历模块集合中的所有注册项，识别实现了指定能力的具体类型。

use crate::capability::CapabilityKey;
use crate::module::ModuleSet;
use crate::registry::TypeRegistration;
use infrastructure_common::{ComponentError, ModuleLoadError, TypeInfo};

/// 能力扫描器 trait
pub trait CapabilityScanner: Send + Sync {
    /// 获取扫描器名称
    fn name(&self) -> &str;

    /// 扫描模块集合
    ///
    /// 结果按模块顺序、模块内声明顺序排列，同一具体类型只出现一次。
    /// 模块集合为空时返回 [`ComponentError::ScanError`]。
    fn discover(&self, modules: &ModuleSet) -> Result<ScanReport, ComponentError>;
}

/// 扫描匹配项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanMatch {
    /// 具体实现类型
    pub concrete: TypeInfo,
    /// 满足的封闭能力
    pub key: CapabilityKey,
}

/// 扫描结果
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// 去重后的注册项
    pub registrations: Vec<TypeRegistration>,
    /// 加载失败的模块
    pub diagnostics: Vec<ModuleLoadError>,
}

impl ScanReport {
    /// 实现指定契约任意封闭实例的类型，每个不同的类型参数各出现一次
    pub fn implementers(&self, contract: &str) -> Vec<ScanMatch> {
        self.registrations
            .iter()
            .flat_map(|registration| {
                registration
                    .capability_keys()
                    .filter(|key| key.is_instance_of(contract))
                    .map(move |key| ScanMatch {
                        concrete: registration.type_info,
                        key,
                    })
            })
            .collect()
    }

    /// 实现指定封闭能力的类型
    pub fn implementers_of(&self, key: &CapabilityKey) -> Vec<TypeInfo> {
        implementers_of(&self.registrations, key)
    }

    /// 是否存在加载失败的模块
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// 从注册项中筛选实现指定封闭能力的类型，保持输入顺序
pub fn implementers_of<'a>(
    registrations: impl IntoIterator<Item = &'a TypeRegistration>,
    key: &CapabilityKey,
) -> Vec<TypeInfo> {
    registrations
        .into_iter()
        .filter(|registration| registration.provides(key))
        .map(|registration| registration.type_info)
        .collect()
}
