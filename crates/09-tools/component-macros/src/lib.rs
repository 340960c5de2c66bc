//! # Component Macros
//!
//! 这个 crate 提供了用于生成组件清单条目的过程宏。
//!
//! ## 核心宏
//!
//! - [`Component`](derive@Component) - 为结构体实现 `RegisterableComponent`
//!
//! ## 使用示例
//!
//! ```rust
//! use component_macros::Component;
//! use di_abstractions::RegisterableComponent;
//! use infrastructure_common::{ApplicationStartedEvent, Handle, HandlerResult, Lifetime};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! pub struct Clock;
//!
//! #[derive(Component)]
//! #[component(singleton, handles(ApplicationStartedEvent))]
//! pub struct Greeter {
//!     clock: Arc<Clock>,
//!     audit: Option<Arc<String>>,
//!     greetings: u32,
//! }
//!
//! #[async_trait::async_trait]
//! impl Handle<ApplicationStartedEvent> for Greeter {
//!     async fn handle(&self, _event: &ApplicationStartedEvent) -> HandlerResult {
//!         Ok(())
//!     }
//! }
//!
//! let registration = Greeter::registration();
//! assert_eq!(registration.lifetime, Lifetime::Singleton);
//! assert_eq!(registration.dependencies.len(), 2);
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod component;
mod utils;

/// 组件清单派生宏
///
/// 为结构体生成 `di_abstractions::RegisterableComponent` 实现。
///
/// # 字段
///
/// - `Arc<T>` - 必需依赖
/// - `Option<Arc<T>>` - 可选依赖
/// - 其他类型 - 使用 `Default::default()` 初始化
///
/// # 参数
///
/// - `singleton` - 单例生命周期（默认）
/// - `transient` - 瞬态生命周期
/// - `handles(E1, E2, ...)` - 处理的事件类型
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Component)]
/// #[component(transient, handles(ApplicationStartedEvent))]
/// pub struct MyHandler {
///     database: Arc<Database>,
/// }
/// ```
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_component_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
