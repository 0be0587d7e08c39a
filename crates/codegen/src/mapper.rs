//! Schema types -> TypeScript types.
//!
//! The [`TypeMapper`] walks type references in the order the router emitter
//! asks for them and declares every composite type the first time it is seen.
//! A type is registered before its fields are mapped, so recursive types
//! terminate, and its declaration is pushed after its fields are mapped, so
//! every dependency is declared before the type that uses it.

use std::collections::HashMap;

use tracing::trace;

use crate::error::SchemaError;
use crate::schema::{CompositeKind, Primitive, Router, TypeKey, TypeRef};
use crate::ts::{TsLiteral, TsPrimitive, TsProp, TsType, TsTypeDef};

/// Emitted identifier -> the schema type that owns it.
///
/// Append-only and owned by a single generation run.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    owners: HashMap<String, TypeKey>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, key: &TypeKey) -> bool {
        self.owners.get(&key.ts_ident()) == Some(key)
    }

    /// Claim the emitted identifier of `key`. Idempotent for the same key.
    pub fn register(&mut self, key: &TypeKey) -> Result<String, SchemaError> {
        let ident = key.ts_ident();
        match self.owners.get(&ident) {
            Some(owner) if owner == key => Ok(ident),
            Some(owner) => Err(SchemaError::DuplicateTypeIdentifier {
                ident,
                first: owner.to_string(),
                second: key.to_string(),
            }),
            None => {
                self.owners.insert(ident.clone(), key.clone());
                Ok(ident)
            }
        }
    }

    /// The schema type that claimed `ident`, if any.
    pub fn owner(&self, ident: &str) -> Option<&TypeKey> {
        self.owners.get(ident)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[derive(Debug)]
pub struct TypeMapper<'r> {
    router: &'r Router,
    registry: TypeRegistry,
    declarations: Vec<TsTypeDef>,
}

impl<'r> TypeMapper<'r> {
    pub fn new(router: &'r Router) -> Self {
        Self {
            router,
            registry: TypeRegistry::new(),
            declarations: Vec::new(),
        }
    }

    /// Map a type reference, declaring any composite type it mentions.
    pub fn map_type(&mut self, ty: &TypeRef) -> Result<TsType, SchemaError> {
        Ok(match ty {
            TypeRef::Primitive(primitive) => TsType::primitive(map_primitive(*primitive)),
            TypeRef::Optional(inner) => TsType::nullable(self.map_type(inner)?),
            TypeRef::Collection(inner) => TsType::Array(Box::new(self.map_type(inner)?)),
            TypeRef::Named(key) => TsType::Ref(self.declare(key)?),
        })
    }

    /// Declare every composite type of the router that has not been reached yet.
    pub fn declare_remaining(&mut self) -> Result<(), SchemaError> {
        let router = self.router;
        for composite in router.types() {
            self.declare(&composite.key)?;
        }
        Ok(())
    }

    fn declare(&mut self, key: &TypeKey) -> Result<String, SchemaError> {
        if self.registry.is_registered(key) {
            return Ok(key.ts_ident());
        }

        let router = self.router;
        let composite = router
            .composite(key)
            .ok_or_else(|| SchemaError::UnresolvedTypeReference {
                name: key.to_string(),
                referrer: "the type mapper".to_string(),
            })?;
        let ident = self.registry.register(key)?;

        let ty = match &composite.kind {
            CompositeKind::Struct { fields } => {
                let mut props = Vec::with_capacity(fields.len());
                for field in fields {
                    props.push(TsProp {
                        name: field.name.clone(),
                        ty: self.map_type(&field.ty)?,
                    });
                }
                TsType::Object(props)
            }
            CompositeKind::Enum { variants } => TsType::Union(
                variants
                    .iter()
                    .map(|v| TsType::Literal(TsLiteral::String(v.clone())))
                    .collect(),
            ),
        };

        trace!(ident = %ident, key = %key, "Declared composite type.");
        self.declarations.push(TsTypeDef {
            name: ident.clone(),
            ty,
        });
        Ok(ident)
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Declarations so far, dependencies first.
    pub fn declarations(&self) -> &[TsTypeDef] {
        &self.declarations
    }

    pub fn into_declarations(self) -> Vec<TsTypeDef> {
        self.declarations
    }
}

fn map_primitive(primitive: Primitive) -> TsPrimitive {
    match primitive {
        Primitive::Number => TsPrimitive::Number,
        Primitive::String => TsPrimitive::String,
        Primitive::Boolean => TsPrimitive::Boolean,
        Primitive::Unit => TsPrimitive::Null,
    }
}
