//! JSON source description of a procedure table.
//!
//! ```json
//! {
//!   "procedures": [
//!     { "name": "add_numbers", "kind": "mutation",
//!       "input": [{ "name": "first", "type": "i32" }, { "name": "second", "type": "i32" }],
//!       "output": "i32" }
//!   ],
//!   "types": [
//!     { "name": "User", "fields": [{ "name": "nick", "type": { "optional": "String" } }] }
//!   ]
//! }
//! ```

use serde::Deserialize;
use tracing::debug;

use super::{CompositeType, Field, Primitive, ProcedureDef, ProcedureKind, Router, RouterBuilder};
use super::{InputDef, TypeKey, TypeRef};
use crate::error::SchemaError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceDocument {
    #[serde(default)]
    procedures: Vec<ProcedureSource>,
    #[serde(default)]
    types: Vec<TypeSource>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProcedureSource {
    name: String,
    kind: ProcedureKind,
    #[serde(default)]
    input: Option<InputSource>,
    #[serde(default)]
    output: Option<TypeExpr>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputSource {
    Fields(Vec<FieldSource>),
    Type(DirectInput),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DirectInput {
    #[serde(rename = "type")]
    ty: TypeExpr,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldSource {
    name: String,
    #[serde(rename = "type")]
    ty: TypeExpr,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeSource {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    fields: Option<Vec<FieldSource>>,
    #[serde(default)]
    variants: Option<Vec<String>>,
}

/// Untagged, so each object form denies unknown keys itself; otherwise
/// `{ "optional": .., "ref": .. }` would quietly match the first variant.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeExpr {
    Primitive(String),
    Optional(OptionalExpr),
    List(ListExpr),
    Ref(RefExpr),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionalExpr {
    optional: Box<TypeExpr>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListExpr {
    list: Box<TypeExpr>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RefExpr {
    #[serde(rename = "ref")]
    name: String,
    #[serde(default)]
    namespace: Option<String>,
}

impl TypeExpr {
    fn resolve(self) -> Result<TypeRef, SchemaError> {
        Ok(match self {
            TypeExpr::Primitive(name) => match Primitive::from_name(&name) {
                Some(primitive) => TypeRef::Primitive(primitive),
                None => return Err(SchemaError::UnknownPrimitive { name }),
            },
            TypeExpr::Optional(OptionalExpr { optional }) => {
                TypeRef::optional(optional.resolve()?)
            }
            TypeExpr::List(ListExpr { list }) => TypeRef::list(list.resolve()?),
            TypeExpr::Ref(RefExpr { name, namespace }) => {
                TypeRef::Named(TypeKey { namespace, name })
            }
        })
    }
}

fn resolve_fields(fields: Vec<FieldSource>) -> Result<Vec<Field>, SchemaError> {
    fields
        .into_iter()
        .map(|field| Ok(Field::new(field.name, field.ty.resolve()?)))
        .collect()
}

impl TypeSource {
    fn into_composite(self) -> Result<CompositeType, SchemaError> {
        let key = TypeKey {
            namespace: self.namespace,
            name: self.name,
        };
        match (self.fields, self.variants) {
            (Some(fields), None) => Ok(CompositeType::structure(key, resolve_fields(fields)?)),
            (None, Some(variants)) => Ok(CompositeType::enumeration(key, variants)),
            (Some(_), Some(_)) => Err(SchemaError::InvalidComposite {
                name: key.to_string(),
                reason: "declares both `fields` and `variants`",
            }),
            (None, None) => Err(SchemaError::InvalidComposite {
                name: key.to_string(),
                reason: "declares neither `fields` nor `variants`",
            }),
        }
    }
}

impl ProcedureSource {
    fn into_def(self) -> Result<ProcedureDef, SchemaError> {
        let input = match self.input {
            Some(InputSource::Fields(fields)) => Some(InputDef::Fields(resolve_fields(fields)?)),
            Some(InputSource::Type(DirectInput { ty })) => Some(InputDef::Type(ty.resolve()?)),
            None => None,
        };
        let output = self.output.map(TypeExpr::resolve).transpose()?;
        Ok(ProcedureDef {
            name: self.name,
            kind: self.kind,
            input,
            output,
        })
    }
}

/// Parse and validate a JSON procedure table.
pub fn load(source: &str) -> Result<Router, SchemaError> {
    let document: SourceDocument = serde_json::from_str(source)?;
    debug!(
        procedures = document.procedures.len(),
        types = document.types.len(),
        "Parsed procedure schema source."
    );

    let mut builder = RouterBuilder::new();
    for ty in document.types {
        builder = builder.composite(ty.into_composite()?);
    }
    for procedure in document.procedures {
        builder = builder.procedure(procedure.into_def()?);
    }
    builder.build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::schema::CompositeKind;

    #[test]
    fn test_load_procedures_and_types() {
        let router = load(
            r#"{
                "procedures": [
                    { "name": "get_user", "kind": "query",
                      "input": [{ "name": "user_id", "type": "u64" }],
                      "output": { "ref": "User" } },
                    { "name": "no_output", "kind": "query" }
                ],
                "types": [
                    { "name": "User", "fields": [
                        { "name": "id", "type": "u64" },
                        { "name": "nick", "type": { "optional": "String" } }
                    ] }
                ]
            }"#,
        )
        .unwrap();

        let get_user = router.procedure("get_user").unwrap();
        assert_eq!(get_user.kind, ProcedureKind::Query);
        assert_eq!(get_user.input, Some(TypeRef::named("GetUserInput")));
        assert_eq!(get_user.output, Some(TypeRef::named("User")));

        let user = router.composite(&TypeKey::new("User")).unwrap();
        assert_eq!(
            user.kind,
            CompositeKind::Struct {
                fields: vec![
                    Field::new("id", TypeRef::number()),
                    Field::new("nick", TypeRef::optional(TypeRef::string())),
                ]
            }
        );
    }

    #[test]
    fn test_direct_input_type_and_namespaced_ref() {
        let router = load(
            r#"{
                "procedures": [
                    { "name": "set_status", "kind": "mutation",
                      "input": { "type": { "ref": "Status", "namespace": "billing" } } }
                ],
                "types": [
                    { "name": "Status", "namespace": "billing", "variants": ["active", "closed"] }
                ]
            }"#,
        )
        .unwrap();

        let key = TypeKey::namespaced("billing", "Status");
        assert_eq!(
            router.procedure("set_status").unwrap().input,
            Some(TypeRef::Named(key.clone()))
        );
        assert!(router.composite(&key).is_some());
    }

    #[test]
    fn test_list_of_optional() {
        let router = load(
            r#"{ "procedures": [
                { "name": "tags", "kind": "query", "output": { "list": { "optional": "string" } } }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            router.procedure("tags").unwrap().output,
            Some(TypeRef::list(TypeRef::optional(TypeRef::string())))
        );
    }

    #[test]
    fn test_unknown_primitive() {
        let err = load(r#"{ "procedures": [{ "name": "x", "kind": "query", "output": "u256" }] }"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownPrimitive { name } if name == "u256"));
    }

    #[test]
    fn test_composite_needs_exactly_one_body() {
        let err = load(r#"{ "types": [{ "name": "Empty" }] }"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidComposite { .. }));

        let err = load(r#"{ "types": [{ "name": "Both", "fields": [], "variants": ["a"] }] }"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidComposite { .. }));
    }

    #[test]
    fn test_malformed_source() {
        assert!(matches!(
            load("{ not json").unwrap_err(),
            SchemaError::InvalidSource(_)
        ));
        assert!(matches!(
            load(r#"{ "procedures": [{ "name": "x", "kind": "subscription" }] }"#).unwrap_err(),
            SchemaError::InvalidSource(_)
        ));
    }

    #[test]
    fn test_ambiguous_type_object_is_rejected() {
        let err = load(
            r#"{ "procedures": [
                { "name": "x", "kind": "query", "output": { "optional": "string", "ref": "X" } }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSource(_)));

        let err = load(
            r#"{ "procedures": [
                { "name": "x", "kind": "query", "input": { "type": "string", "extra": 1 } }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSource(_)));
    }
}
