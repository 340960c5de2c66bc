//! 宏工具函数

use syn::{GenericArgument, PathArguments, Type};

/// 字段的注入方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind<'a> {
    /// `Arc<T>`：必需依赖
    Required(&'a Type),
    /// `Option<Arc<T>>`：可选依赖
    Optional(&'a Type),
    /// 其他：`Default::default()`
    Default,
}

/// 从类型中提取指定包装类型的唯一泛型参数，例如 `Arc<T>` 中的 `T`
pub fn extract_generic_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(inner_type)) => Some(inner_type),
            _ => None,
        },
        _ => None,
    }
}

/// 判断字段的注入方式
pub fn classify_field(ty: &Type) -> FieldKind<'_> {
    if let Some(inner) = extract_generic_type(ty, "Arc") {
        return FieldKind::Required(inner);
    }
    if let Some(inner) = extract_generic_type(ty, "Option").and_then(|t| extract_generic_type(t, "Arc")) {
        return FieldKind::Optional(inner);
    }
    FieldKind::Default
}
