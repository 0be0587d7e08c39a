use std::collections::{HashSet, VecDeque};

use heck::ToPascalCase;
use indexmap::IndexMap;
use tracing::debug;

use super::{
    CompositeKind, CompositeType, Field, Procedure, ProcedureKind, Router, TypeKey, TypeRef,
};
use crate::error::SchemaError;
use crate::ts::utils::{is_declarable_type_name, is_valid_identifier};

/// How a procedure declares its input before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDef {
    /// Named arguments, collected into a synthesized `<Name>Input` struct.
    Fields(Vec<Field>),
    /// A direct type reference.
    Type(TypeRef),
}

/// An unvalidated procedure declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureDef {
    pub name: String,
    pub kind: ProcedureKind,
    pub input: Option<InputDef>,
    pub output: Option<TypeRef>,
}

impl ProcedureDef {
    pub fn new(name: impl Into<String>, kind: ProcedureKind) -> Self {
        Self {
            name: name.into(),
            kind,
            input: None,
            output: None,
        }
    }

    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, ProcedureKind::Query)
    }

    pub fn mutation(name: impl Into<String>) -> Self {
        Self::new(name, ProcedureKind::Mutation)
    }

    pub fn input(mut self, ty: TypeRef) -> Self {
        self.input = Some(InputDef::Type(ty));
        self
    }

    pub fn input_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = (S, TypeRef)>,
    ) -> Self {
        self.input = Some(InputDef::Fields(
            fields
                .into_iter()
                .map(|(name, ty)| Field::new(name, ty))
                .collect(),
        ));
        self
    }

    pub fn output(mut self, ty: TypeRef) -> Self {
        self.output = Some(ty);
        self
    }

    /// Name of the struct synthesized from named input fields.
    pub fn input_type_name(&self) -> String {
        format!("{}Input", self.name.to_pascal_case())
    }
}

/// Collects procedures and composite types, then validates them into a [`Router`].
#[derive(Debug, Default, Clone)]
pub struct RouterBuilder {
    procedures: Vec<ProcedureDef>,
    types: Vec<CompositeType>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn procedure(mut self, procedure: ProcedureDef) -> Self {
        self.procedures.push(procedure);
        self
    }

    pub fn composite(mut self, ty: CompositeType) -> Self {
        self.types.push(ty);
        self
    }

    /// Validate everything and close the type graph over what procedures reach.
    pub fn build(self) -> Result<Router, SchemaError> {
        let mut types: IndexMap<TypeKey, CompositeType> = IndexMap::new();

        for ty in self.types {
            validate_composite(&ty)?;
            register_composite(&mut types, ty)?;
        }

        let mut names = HashSet::new();
        let mut procedures = Vec::with_capacity(self.procedures.len());

        for def in self.procedures {
            if def.name.is_empty() {
                return Err(SchemaError::InvalidIdentifier {
                    what: "a procedure name".to_string(),
                    value: def.name,
                });
            }
            if !names.insert(def.name.clone()) {
                return Err(SchemaError::DuplicateProcedureName { name: def.name });
            }

            let input_type_name = def.input_type_name();
            let input = match def.input {
                Some(InputDef::Fields(fields)) if fields.is_empty() => None,
                Some(InputDef::Fields(fields)) => {
                    let key = TypeKey::new(input_type_name);
                    let synthesized = CompositeType::structure(key.clone(), fields);
                    validate_composite(&synthesized)?;
                    if let Some(existing) = types.get(&key) {
                        return Err(SchemaError::DuplicateTypeIdentifier {
                            ident: key.ts_ident(),
                            first: existing.key.to_string(),
                            second: format!("input of procedure `{}`", def.name),
                        });
                    }
                    types.insert(key.clone(), synthesized);
                    Some(TypeRef::Named(key))
                }
                Some(InputDef::Type(ty)) if ty.is_unit() => None,
                Some(InputDef::Type(ty)) => Some(ty),
                None => None,
            };

            let output = def.output.filter(|ty| !ty.is_unit());

            procedures.push(Procedure {
                name: def.name,
                kind: def.kind,
                input,
                output,
            });
        }

        resolve_references(&procedures, &types)?;
        let total = types.len();
        let types = reachable_types(&procedures, types);

        debug!(
            procedures = procedures.len(),
            types = types.len(),
            dropped = total - types.len(),
            "Procedure schema validated."
        );

        Ok(Router::from_parts(procedures, types))
    }
}

fn register_composite(
    types: &mut IndexMap<TypeKey, CompositeType>,
    ty: CompositeType,
) -> Result<(), SchemaError> {
    match types.get(&ty.key) {
        // Re-declaring the exact same type is how shared types show up when a
        // backend dumps each procedure's closure separately.
        Some(existing) if *existing == ty => Ok(()),
        Some(existing) => Err(SchemaError::DuplicateTypeIdentifier {
            ident: ty.key.ts_ident(),
            first: existing.key.to_string(),
            second: ty.key.to_string(),
        }),
        None => {
            types.insert(ty.key.clone(), ty);
            Ok(())
        }
    }
}

fn validate_composite(ty: &CompositeType) -> Result<(), SchemaError> {
    if !is_valid_identifier(&ty.key.name) {
        return Err(SchemaError::InvalidIdentifier {
            what: "a type name".to_string(),
            value: ty.key.name.clone(),
        });
    }
    if let Some(namespace) = &ty.key.namespace
        && (namespace.is_empty() || !is_valid_identifier(&ty.key.ts_ident()))
    {
        return Err(SchemaError::InvalidIdentifier {
            what: format!("the namespace of `{}`", ty.key.name),
            value: namespace.clone(),
        });
    }
    let ident = ty.key.ts_ident();
    if !is_declarable_type_name(&ident) {
        return Err(SchemaError::InvalidIdentifier {
            what: "a declared type name".to_string(),
            value: ident,
        });
    }

    let owner = ty.key.to_string();
    match &ty.kind {
        CompositeKind::Struct { fields } => {
            let mut seen = HashSet::new();
            for field in fields {
                if field.name.is_empty() {
                    return Err(SchemaError::InvalidIdentifier {
                        what: format!("a field of `{owner}`"),
                        value: field.name.clone(),
                    });
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        owner,
                        field: field.name.clone(),
                    });
                }
            }
        }
        CompositeKind::Enum { variants } => {
            if variants.is_empty() {
                return Err(SchemaError::InvalidComposite {
                    name: owner,
                    reason: "is an enum without variants",
                });
            }
            let mut seen = HashSet::new();
            for variant in variants {
                if !seen.insert(variant.as_str()) {
                    return Err(SchemaError::DuplicateVariant {
                        owner,
                        variant: variant.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Every named reference, from procedures and from declared types alike, must
/// point at a declared composite.
fn resolve_references(
    procedures: &[Procedure],
    types: &IndexMap<TypeKey, CompositeType>,
) -> Result<(), SchemaError> {
    for procedure in procedures {
        let referrer = format!("procedure `{}`", procedure.name);
        for ty in procedure.input.iter().chain(procedure.output.iter()) {
            check_keys(ty.named_keys(), types, &referrer)?;
        }
    }
    for ty in types.values() {
        check_keys(ty.references(), types, &format!("type `{}`", ty.key))?;
    }
    Ok(())
}

fn check_keys(
    keys: Vec<&TypeKey>,
    types: &IndexMap<TypeKey, CompositeType>,
    referrer: &str,
) -> Result<(), SchemaError> {
    match keys.into_iter().find(|key| !types.contains_key(*key)) {
        Some(missing) => Err(SchemaError::UnresolvedTypeReference {
            name: missing.to_string(),
            referrer: referrer.to_string(),
        }),
        None => Ok(()),
    }
}

/// Keep only the composite types reachable from a procedure, in declaration order.
fn reachable_types(
    procedures: &[Procedure],
    mut types: IndexMap<TypeKey, CompositeType>,
) -> IndexMap<TypeKey, CompositeType> {
    let mut reached: HashSet<TypeKey> = HashSet::new();
    let mut queue: VecDeque<TypeKey> = procedures
        .iter()
        .flat_map(|p| p.input.iter().chain(p.output.iter()))
        .flat_map(|ty| ty.named_keys().into_iter().cloned())
        .collect();

    while let Some(key) = queue.pop_front() {
        if !reached.insert(key.clone()) {
            continue;
        }
        if let Some(ty) = types.get(&key) {
            queue.extend(ty.references().into_iter().cloned());
        }
    }

    types.retain(|key, _| reached.contains(key));
    types
}
