//! 默认能力扫描器

use di_abstractions::{CapabilityScanner, ModuleSet, ScanReport};
use infrastructure_common::ComponentError;
use std::any::TypeId;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// 默认能力扫描器
///
/// 按模块顺序加载清单，以 `TypeId` 去重；同一类型在多个模块中重复导出时
/// 保留首次出现的位置，并把重复导出中新增的能力合并到首次出现的注册项。
/// 构造策略冲突的重复项会原样保留，由容器注册时报告。
#[derive(Debug, Clone)]
pub struct DefaultCapabilityScanner {
    name: String,
}

impl DefaultCapabilityScanner {
    /// 创建扫描器
    pub fn new() -> Self {
        Self {
            name: "default".to_string(),
        }
    }
}

impl Default for DefaultCapabilityScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityScanner for DefaultCapabilityScanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn discover(&self, modules: &ModuleSet) -> Result<ScanReport, ComponentError> {
        if modules.is_empty() {
            return Err(ComponentError::scan_error("模块集合为空"));
        }

        let mut report = ScanReport::default();
        let mut seen: HashMap<TypeId, usize> = HashMap::new();

        for module in modules.iter() {
            let entries = match module.load() {
                Ok(entries) => entries,
                Err(error) => {
                    warn!("跳过无法加载的模块: {}", error);
                    report.diagnostics.push(error);
                    continue;
                }
            };

            debug!("扫描模块: {} ({} 个注册项)", module.name(), entries.len());

            for entry in entries {
                match seen.get(&entry.type_info.id).copied() {
                    Some(index) if report.registrations[index].lifetime == entry.lifetime => {
                        let first = &mut report.registrations[index];
                        for binding in entry.capabilities {
                            if !first.provides(&binding.key) {
                                debug!(
                                    "合并重复导出的能力: {} -> {} (模块 {})",
                                    first.type_info,
                                    binding.key,
                                    module.name()
                                );
                                first.capabilities.push(binding);
                            }
                        }
                        debug!(
                            "忽略重复导出: {} (模块 {})",
                            first.type_info,
                            module.name()
                        );
                    }
                    Some(_) => {
                        report.registrations.push(entry.in_module(module.name()));
                    }
                    None => {
                        seen.insert(entry.type_info.id, report.registrations.len());
                        report.registrations.push(entry.in_module(module.name()));
                    }
                }
            }
        }

        info!(
            "扫描器 {} 完成: {} 个模块, {} 个组件, {} 个模块加载失败",
            self.name,
            modules.len(),
            report.registrations.len(),
            report.diagnostics.len()
        );

        Ok(report)
    }
}
