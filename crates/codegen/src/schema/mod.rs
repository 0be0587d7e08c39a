//! In-memory model of a backend's procedure table.
//!
//! A [`Router`] is produced either by [`load`] from a JSON source description
//! or by [`RouterBuilder`]. Both paths run the same validation, so a `Router`
//! value is always closed: every named reference resolves, names are unique,
//! and only composite types reachable from a procedure are kept.

mod builder;
mod source;

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

pub use builder::{InputDef, ProcedureDef, RouterBuilder};
pub use source::load;

/// Scalar types understood by every target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Number,
    String,
    Boolean,
    Unit,
}

impl Primitive {
    /// Resolve a primitive from the spellings backends commonly use.
    pub fn from_name(name: &str) -> Option<Self> {
        let primitive = match name {
            "number" | "integer" | "float" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize"
            | "u8" | "u16" | "u32" | "u64" | "u128" | "usize" | "f32" | "f64" => {
                Primitive::Number
            }
            "string" | "String" | "char" | "str" => Primitive::String,
            "boolean" | "bool" => Primitive::Boolean,
            "unit" | "null" | "()" => Primitive::Unit,
            _ => return None,
        };
        Some(primitive)
    }
}

/// Registry key of a composite type.
///
/// The namespace keeps two backend types with the same bare name apart. It is
/// folded into the emitted identifier, see [`TypeKey::ts_ident`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub namespace: Option<String>,
    pub name: String,
}

impl TypeKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// The identifier this type is declared under in generated code:
    /// `billing` + `Status` becomes `BillingStatus`.
    pub fn ts_ident(&self) -> String {
        use heck::ToPascalCase;

        match &self.namespace {
            Some(namespace) => format!("{}{}", namespace.to_pascal_case(), self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{namespace}::{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Reference to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    Optional(Box<TypeRef>),
    Collection(Box<TypeRef>),
    Named(TypeKey),
}

impl TypeRef {
    pub fn number() -> Self {
        TypeRef::Primitive(Primitive::Number)
    }

    pub fn string() -> Self {
        TypeRef::Primitive(Primitive::String)
    }

    pub fn boolean() -> Self {
        TypeRef::Primitive(Primitive::Boolean)
    }

    pub fn unit() -> Self {
        TypeRef::Primitive(Primitive::Unit)
    }

    pub fn optional(inner: TypeRef) -> Self {
        TypeRef::Optional(Box::new(inner))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::Collection(Box::new(inner))
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(TypeKey::new(name))
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, TypeRef::Primitive(Primitive::Unit))
    }

    /// Every composite key mentioned anywhere inside this reference.
    pub fn named_keys(&self) -> Vec<&TypeKey> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys<'a>(&'a self, keys: &mut Vec<&'a TypeKey>) {
        match self {
            TypeRef::Primitive(_) => {}
            TypeRef::Optional(inner) | TypeRef::Collection(inner) => inner.collect_keys(keys),
            TypeRef::Named(key) => keys.push(key),
        }
    }
}

/// A named field of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeKind {
    /// Ordered fields; order is kept in the emitted declaration.
    Struct { fields: Vec<Field> },
    /// Unit-only enum, emitted as a union of string literals.
    Enum { variants: Vec<String> },
}

/// A named aggregate referenced by one or more procedures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeType {
    pub key: TypeKey,
    pub kind: CompositeKind,
}

impl CompositeType {
    pub fn structure(key: TypeKey, fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            key,
            kind: CompositeKind::Struct {
                fields: fields.into_iter().collect(),
            },
        }
    }

    pub fn enumeration<S: Into<String>>(key: TypeKey, variants: impl IntoIterator<Item = S>) -> Self {
        Self {
            key,
            kind: CompositeKind::Enum {
                variants: variants.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Composite keys referenced directly by this type's fields.
    pub fn references(&self) -> Vec<&TypeKey> {
        match &self.kind {
            CompositeKind::Struct { fields } => {
                fields.iter().flat_map(|f| f.ty.named_keys()).collect()
            }
            CompositeKind::Enum { .. } => Vec::new(),
        }
    }
}

/// Whether a procedure is side-effect free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl ProcedureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureKind::Query => "query",
            ProcedureKind::Mutation => "mutation",
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single remotely callable operation, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub name: String,
    pub kind: ProcedureKind,
    pub input: Option<TypeRef>,
    pub output: Option<TypeRef>,
}

/// The validated procedure table plus the closure of the composite types it
/// references. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    procedures: Vec<Procedure>,
    types: IndexMap<TypeKey, CompositeType>,
}

impl Router {
    pub(crate) fn from_parts(
        procedures: Vec<Procedure>,
        types: IndexMap<TypeKey, CompositeType>,
    ) -> Self {
        Self { procedures, types }
    }

    /// Procedures in registration order.
    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name == name)
    }

    /// Composite types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &CompositeType> {
        self.types.values()
    }

    pub fn composite(&self, key: &TypeKey) -> Option<&CompositeType> {
        self.types.get(key)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_spellings() {
        assert_eq!(Primitive::from_name("u64"), Some(Primitive::Number));
        assert_eq!(Primitive::from_name("f32"), Some(Primitive::Number));
        assert_eq!(Primitive::from_name("String"), Some(Primitive::String));
        assert_eq!(Primitive::from_name("bool"), Some(Primitive::Boolean));
        assert_eq!(Primitive::from_name("()"), Some(Primitive::Unit));
        assert_eq!(Primitive::from_name("u256"), None);
    }

    #[test]
    fn test_type_key_ident() {
        assert_eq!(TypeKey::new("User").ts_ident(), "User");
        assert_eq!(
            TypeKey::namespaced("billing_v2", "Status").ts_ident(),
            "BillingV2Status"
        );
        assert_eq!(TypeKey::namespaced("auth", "User").to_string(), "auth::User");
    }

    #[test]
    fn test_named_keys_walks_wrappers() {
        let ty = TypeRef::optional(TypeRef::list(TypeRef::named("User")));
        assert_eq!(ty.named_keys(), vec![&TypeKey::new("User")]);
        assert!(TypeRef::string().named_keys().is_empty());
    }
}
