//! 组合配置
//!
//! 依次读取可选的 TOML 文件和带前缀的环境变量（`<PREFIX>__SECTION__KEY`），
//! 后者覆盖前者。

use crate::logging::LoggingConfig;
use di_abstractions::ContainerConfig;
use infrastructure_common::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, error};

/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "APP";

/// 日志设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
    /// 是否显示目标
    pub show_target: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            show_target: true,
        }
    }
}

impl LoggingSettings {
    /// 转换为日志配置
    pub fn to_config(&self) -> Result<LoggingConfig, ConfigError> {
        let level = tracing::Level::from_str(self.level.trim()).map_err(|_| {
            ConfigError::ValidationError {
                message: format!("无效的日志级别: {}", self.level),
            }
        })?;

        Ok(LoggingConfig {
            level,
            show_target: self.show_target,
            json_format: self.json,
            ..LoggingConfig::default()
        })
    }
}

/// 组合设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionSettings {
    /// 容器配置
    pub container: ContainerConfig,
    /// 日志设置
    pub logging: LoggingSettings,
    /// 构建时是否校验所有事件的处理器唯一性
    pub verify_handlers_on_build: bool,
}

impl Default for CompositionSettings {
    fn default() -> Self {
        Self {
            container: ContainerConfig::default(),
            logging: LoggingSettings::default(),
            verify_handlers_on_build: true,
        }
    }
}

impl CompositionSettings {
    /// 加载设置
    ///
    /// 配置文件不存在时忽略，仅使用环境变量和默认值。
    pub fn load(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("加载配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        let loaded: Self = settings.try_deserialize().map_err(|e| {
            error!("配置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// 从必须存在的配置文件加载设置
    pub fn from_file(path: &Path, env_prefix: &str) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::load(Some(path), env_prefix)
    }

    /// 校验设置
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.to_config().map(|_| ())
    }
}
