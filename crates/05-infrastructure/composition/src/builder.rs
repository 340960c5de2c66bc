//! 组合构建器
//!
//! 两阶段启动：先扫描模块并静态校验依赖图，再按拓扑顺序构造单例并建立事件处理器注册表。

use crate::root::CompositionRoot;
use crate::settings::CompositionSettings;
use di_abstractions::{CapabilityScanner, DiContainer, ModuleSet, ModuleSource};
use di_impl::{DefaultCapabilityScanner, DiContainerImpl, EventHandlerRegistry};
use infrastructure_common::{InfrastructureError, StartupContext};
use std::sync::Arc;
use tracing::{debug, info};

type ConstantSeed = Box<dyn FnOnce(&mut DiContainerImpl) + Send>;

/// 组合构建器
pub struct CompositionBuilder {
    /// 待扫描的模块
    modules: ModuleSet,
    /// 能力扫描器
    scanner: Box<dyn CapabilityScanner>,
    /// 组合设置
    settings: CompositionSettings,
    /// 启动上下文
    startup: StartupContext,
    /// 预先构建的常量
    constants: Vec<ConstantSeed>,
}

impl CompositionBuilder {
    /// 创建新的组合构建器
    pub fn new() -> Self {
        Self {
            modules: ModuleSet::new(),
            scanner: Box::new(DefaultCapabilityScanner::new()),
            settings: CompositionSettings::default(),
            startup: StartupContext::default(),
            constants: Vec::new(),
        }
    }

    /// 添加模块
    pub fn add_module(mut self, module: impl ModuleSource + 'static) -> Self {
        debug!("添加模块: {}", module.name());
        self.modules.push(module);
        self
    }

    /// 使用指定的模块集合替换当前模块
    pub fn with_modules(mut self, modules: ModuleSet) -> Self {
        self.modules = modules;
        self
    }

    /// 设置启动上下文
    pub fn with_startup_context(mut self, startup: StartupContext) -> Self {
        self.startup = startup;
        self
    }

    /// 设置组合设置
    pub fn with_settings(mut self, settings: CompositionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 替换能力扫描器
    pub fn with_scanner(mut self, scanner: impl CapabilityScanner + 'static) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    /// 添加常量实例，覆盖同类型的注册项
    pub fn add_constant<T: Send + Sync + 'static>(mut self, value: Arc<T>) -> Self {
        self.constants
            .push(Box::new(move |container: &mut DiContainerImpl| container.add_constant(value)));
        self
    }

    /// 构建组合根
    pub fn build(self) -> Result<CompositionRoot, InfrastructureError> {
        info!(
            "开始组合: {} 个模块, 扫描器 {}",
            self.modules.len(),
            self.scanner.name()
        );

        let report = self.scanner.discover(&self.modules)?;

        let mut container = DiContainerImpl::new();
        for registration in report.registrations {
            container.register(registration)?;
        }

        let startup = Arc::new(self.startup);
        container.add_constant(Arc::clone(&startup));
        for seed in self.constants {
            seed(&mut container);
        }

        if self.settings.container.validate_on_build {
            let order = container.validate()?;
            debug!(
                "依赖图校验通过, 构造顺序: {}",
                order
                    .iter()
                    .map(|t| t.short_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        if self.settings.container.eager_singletons {
            container.initialize_singletons()?;
        }

        let container = Arc::new(container);
        let handlers = if self.settings.verify_handlers_on_build {
            EventHandlerRegistry::new(Arc::clone(&container))?
        } else {
            EventHandlerRegistry::unchecked(Arc::clone(&container))
        };

        info!(
            "组合完成: {} 个组件, {} 个模块加载失败",
            container.len(),
            report.diagnostics.len()
        );

        Ok(CompositionRoot::new(
            container,
            handlers,
            report.diagnostics,
            startup,
        ))
    }
}

impl Default for CompositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
