//! Type catalog: resolves type expressions against manifest-declared types.
//!
//! Handler parameters, return types and object fields reference types by
//! name. A name is either a primitive (`u32`, `String`, ...), a wrapper
//! expression (`Vec<T>`, `Option<T>`), or an object type declared in the
//! manifest's `types` section. Names that are none of these resolve to
//! [`ResolvedKind::Unknown`] and are handled downstream with a placeholder
//! schema.

use crate::registry::TypeDecl;
use log::debug;
use std::collections::BTreeMap;

/// A parsed type expression.
///
/// Wrapper expressions keep the wrapped expression in `inner`; `name` is
/// always the innermost base name (e.g. `"User"` for `Vec<Option<User>>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    /// The base type name
    pub name: String,
    /// Whether the expression is wrapped in `Option<...>` at the top level
    pub is_option: bool,
    /// Whether the expression is wrapped in `Vec<...>` at the top level
    pub is_vec: bool,
    /// The wrapped expression for `Vec`/`Option` wrappers
    pub inner: Option<Box<TypeExpr>>,
}

impl TypeExpr {
    /// Parse a type expression string.
    ///
    /// Recognizes `Vec<T>` and `Option<T>` wrappers (arbitrarily nested);
    /// everything else is treated as a plain type name.
    pub fn parse(expr: &str) -> Self {
        let expr = expr.trim();

        if let Some(inner) = strip_wrapper(expr, "Vec") {
            let inner_expr = Self::parse(inner);
            return Self {
                name: inner_expr.name.clone(),
                is_option: false,
                is_vec: true,
                inner: Some(Box::new(inner_expr)),
            };
        }

        if let Some(inner) = strip_wrapper(expr, "Option") {
            let inner_expr = Self::parse(inner);
            return Self {
                name: inner_expr.name.clone(),
                is_option: true,
                is_vec: false,
                inner: Some(Box::new(inner_expr)),
            };
        }

        Self {
            name: expr.to_string(),
            is_option: false,
            is_vec: false,
            inner: None,
        }
    }
}

/// Strip `Wrapper<...>` and return the inner expression, if it matches.
fn strip_wrapper<'a>(expr: &'a str, wrapper: &str) -> Option<&'a str> {
    expr.strip_prefix(wrapper)?
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix('>')
}

/// Primitive types recognized without a manifest declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
    Bool,
    Char,
}

/// What a base type name resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedKind<'a> {
    /// A primitive type
    Primitive(PrimitiveType),
    /// An object type declared in the manifest
    Object(&'a TypeDecl),
    /// Not a primitive and not declared anywhere
    Unknown,
}

/// Catalog of the manifest's declared types.
pub struct TypeCatalog {
    types: BTreeMap<String, TypeDecl>,
}

impl TypeCatalog {
    /// Create a catalog from the registry's merged type declarations.
    pub fn new(types: BTreeMap<String, TypeDecl>) -> Self {
        debug!("Initializing TypeCatalog with {} declared type(s)", types.len());
        Self { types }
    }

    /// Resolve a base type name.
    pub fn resolve(&self, name: &str) -> ResolvedKind<'_> {
        if let Some(primitive) = parse_primitive(name) {
            return ResolvedKind::Primitive(primitive);
        }
        match self.types.get(name) {
            Some(decl) => ResolvedKind::Object(decl),
            None => {
                debug!("Type {} is neither primitive nor declared", name);
                ResolvedKind::Unknown
            }
        }
    }

    /// Whether the catalog declares an object type under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

/// Map a type name onto a primitive, if it is one.
pub fn parse_primitive(name: &str) -> Option<PrimitiveType> {
    match name {
        "String" | "str" | "&str" => Some(PrimitiveType::String),
        "i8" => Some(PrimitiveType::I8),
        "i16" => Some(PrimitiveType::I16),
        "i32" => Some(PrimitiveType::I32),
        "i64" => Some(PrimitiveType::I64),
        "i128" => Some(PrimitiveType::I128),
        "u8" => Some(PrimitiveType::U8),
        "u16" => Some(PrimitiveType::U16),
        "u32" => Some(PrimitiveType::U32),
        "u64" => Some(PrimitiveType::U64),
        "u128" => Some(PrimitiveType::U128),
        "f32" => Some(PrimitiveType::F32),
        "f64" => Some(PrimitiveType::F64),
        "bool" => Some(PrimitiveType::Bool),
        "char" => Some(PrimitiveType::Char),
        _ => None,
    }
}
