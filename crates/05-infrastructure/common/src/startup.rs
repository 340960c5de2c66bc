//! 启动上下文
//!
//! 由原始进程参数构造的不可变值，以常量形式注入容器，组件通过依赖它读取启动参数，
//! 而不是直接访问进程全局状态。

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// 启动上下文
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupContext {
    args: Vec<String>,
    flags: BTreeSet<String>,
    named: BTreeMap<String, String>,
    positional: Vec<String>,
}

impl StartupContext {
    /// 不打开浏览器
    pub const NO_BROWSER: &'static str = "nobrowser";
    /// 安装为系统服务
    pub const INSTALL_SERVICE: &'static str = "i";
    /// 卸载系统服务
    pub const UNINSTALL_SERVICE: &'static str = "u";
    /// 显示帮助
    pub const HELP: &'static str = "?";
    /// 结束已运行的实例
    pub const TERMINATE: &'static str = "terminateexisting";
    /// 重启后启动
    pub const RESTART: &'static str = "restart";
    /// 应用数据目录覆盖
    pub const APPDATA: &'static str = "data";
    /// 跳过单实例检查
    pub const NO_SINGLE_INSTANCE_CHECK: &'static str = "nosingleinstancecheck";

    /// 从原始参数创建启动上下文
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut flags = BTreeSet::new();
        let mut named = BTreeMap::new();
        let mut positional = Vec::new();

        for arg in &args {
            let trimmed = arg.trim();
            if trimmed.is_empty() {
                continue;
            }

            if trimmed.starts_with('-') || trimmed.starts_with('/') {
                let body = trimmed.trim_start_matches(|c: char| c == '-' || c == '/');
                match body.split_once('=') {
                    Some((key, value)) => {
                        named.insert(
                            key.trim().to_lowercase(),
                            value.trim().trim_matches('"').to_string(),
                        );
                    }
                    None => {
                        flags.insert(body.to_lowercase());
                    }
                }
            } else {
                positional.push(trimmed.to_string());
            }
        }

        debug!(
            "解析启动参数: {} 个标志, {} 个命名参数, {} 个位置参数",
            flags.len(),
            named.len(),
            positional.len()
        );

        Self {
            args,
            flags,
            named,
            positional,
        }
    }

    /// 从当前进程参数创建启动上下文（跳过程序名）
    pub fn from_env() -> Self {
        Self::new(std::env::args().skip(1))
    }

    /// 原始参数
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// 所有标志
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    /// 位置参数
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// 是否包含指定标志（大小写不敏感）
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(&flag.to_lowercase())
    }

    /// 获取命名参数（键大小写不敏感）
    pub fn named(&self, key: &str) -> Option<&str> {
        self.named.get(&key.to_lowercase()).map(String::as_str)
    }

    /// 是否请求安装服务
    pub fn install_service(&self) -> bool {
        self.has_flag(Self::INSTALL_SERVICE)
    }

    /// 是否请求卸载服务
    pub fn uninstall_service(&self) -> bool {
        self.has_flag(Self::UNINSTALL_SERVICE)
    }

    /// 是否为重启后的启动
    pub fn is_restart(&self) -> bool {
        self.has_flag(Self::RESTART)
    }

    /// 应用数据目录覆盖
    pub fn app_data_override(&self) -> Option<&str> {
        self.named(Self::APPDATA)
    }

    /// 重启时需要保留的参数
    pub fn preserved_arguments(&self) -> String {
        let mut preserved = Vec::new();
        if let Some(data) = self.app_data_override() {
            preserved.push(format!("-{}={}", Self::APPDATA, data));
        }
        if self.has_flag(Self::NO_BROWSER) {
            preserved.push(format!("-{}", Self::NO_BROWSER));
        }
        preserved.join(" ")
    }
}
