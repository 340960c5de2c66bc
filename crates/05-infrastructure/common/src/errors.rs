//! 错误类型定义

use thiserror::Error;

/// 模块加载错误
///
/// 始终作为诊断信息被记录，扫描会跳过该模块继续执行。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("模块加载失败: {module}, 原因: {message}")]
pub struct ModuleLoadError {
    /// 模块名称
    pub module: String,
    /// 失败原因
    pub message: String,
}

impl ModuleLoadError {
    /// 创建新的模块加载错误
    pub fn new(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            message: message.into(),
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("无法解析依赖: {type_name}{}", .required_by.as_ref().map(|d| format!(" (被 {d} 依赖)")).unwrap_or_default())]
    UnresolvableDependency {
        type_name: String,
        required_by: Option<String>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("组件重复注册: {type_name}, 已注册为 {existing}, 冲突的注册为 {requested}")]
    DuplicateRegistration {
        type_name: String,
        existing: String,
        requested: String,
    },

    #[error("组件类型不匹配: {type_name}")]
    TypeMismatch { type_name: String },
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件扫描失败: {message}")]
    ScanError { message: String },

    #[error("事件 {event_type} 存在重复的处理器: {}", .classes.join(", "))]
    DuplicateHandler {
        event_type: String,
        classes: Vec<String>,
    },
}

impl ComponentError {
    /// 创建扫描错误
    pub fn scan_error(message: impl Into<String>) -> Self {
        Self::ScanError {
            message: message.into(),
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
