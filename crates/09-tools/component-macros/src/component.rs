//! 组件清单派生宏实现

use crate::utils::{classify_field, FieldKind};
use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parse;
use syn::{parenthesized, Data, DeriveInput, Fields, Result, Token, Type};

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentLifetime {
    Singleton,
    Transient,
}

/// 组件配置参数
#[derive(Debug, Clone)]
pub struct ComponentArgs {
    /// 生命周期类型
    pub lifetime: ComponentLifetime,
    /// 处理的事件类型
    pub handles: Vec<Type>,
}

impl Default for ComponentArgs {
    fn default() -> Self {
        Self {
            lifetime: ComponentLifetime::Singleton,
            handles: Vec::new(),
        }
    }
}

impl ComponentArgs {
    /// 从 `#[component(...)]` 属性解析参数
    pub fn from_attributes(attrs: &[syn::Attribute]) -> Result<Self> {
        let mut args = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("component") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("singleton") {
                    args.lifetime = ComponentLifetime::Singleton;
                } else if meta.path.is_ident("transient") {
                    args.lifetime = ComponentLifetime::Transient;
                } else if meta.path.is_ident("handles") {
                    let content;
                    parenthesized!(content in meta.input);
                    let events = content.parse_terminated(Type::parse, Token![,])?;
                    args.handles.extend(events);
                } else {
                    return Err(meta.error("未知的组件属性, 支持: singleton, transient, handles(...)"));
                }
                Ok(())
            })?;
        }

        Ok(args)
    }
}

/// 实现 #[derive(Component)] 宏
pub fn derive_component_impl(input: &DeriveInput) -> Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "组件不支持泛型参数",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Component)] 只能用于结构体",
            ))
        }
    };

    let args = ComponentArgs::from_attributes(&input.attrs)?;
    let struct_name = &input.ident;

    let mut dependencies = Vec::new();
    let mut values = Vec::new();
    for field in fields.iter() {
        let value = match classify_field(&field.ty) {
            FieldKind::Required(inner) => {
                dependencies.push(quote! {
                    .dependency(::di_abstractions::Dependency::required::<#inner>())
                });
                quote! { __resolver.resolve::<#inner>()? }
            }
            FieldKind::Optional(inner) => {
                dependencies.push(quote! {
                    .dependency(::di_abstractions::Dependency::optional::<#inner>())
                });
                quote! { __resolver.try_resolve::<#inner>()? }
            }
            FieldKind::Default => quote! { ::core::default::Default::default() },
        };
        values.push(value);
    }

    let construct = match fields {
        Fields::Named(named) => {
            let names = named.named.iter().map(|field| &field.ident);
            quote! { Self { #( #names: #values ),* } }
        }
        Fields::Unnamed(_) => quote! { Self( #( #values ),* ) },
        Fields::Unit => quote! { Self },
    };

    let lifetime = match args.lifetime {
        ComponentLifetime::Singleton => quote! { ::di_abstractions::Lifetime::Singleton },
        ComponentLifetime::Transient => quote! { ::di_abstractions::Lifetime::Transient },
    };
    let events = &args.handles;

    Ok(quote! {
        impl ::di_abstractions::RegisterableComponent for #struct_name {
            fn registration() -> ::di_abstractions::TypeRegistration {
                ::di_abstractions::RegistrationBuilder::<Self>::new(|__resolver| {
                    ::core::result::Result::Ok(#construct)
                })
                .lifetime(#lifetime)
                #( #dependencies )*
                #( .handles::<#events>() )*
                .build()
            }
        }
    })
}
