//! Code generation from a validated [`Router`] to a TypeScript module.
//!
//! The module declares every composite type, a stub tRPC router whose
//! procedures mirror the backend's call shapes, and an exported alias of the
//! router's type. Only the alias is meant to be imported by clients: the
//! router value exists because `typeof` needs one, and every resolver in it
//! throws.

use tracing::{debug, trace};

use crate::classify::{CallShape, classify};
use crate::config::GeneratorConfig;
use crate::error::SchemaError;
use crate::mapper::TypeMapper;
use crate::schema::{Procedure, Router};
use crate::ts::{
    Emit, TsExpr, TsImport, TsLiteral, TsModule, TsParam, TsPrimitive, TsStmt, TsType, TsTypeDef,
};

const TRPC_ROOT: &str = "t";
const PROCEDURE_BUILDER: &str = "publicProcedure";

/// The contract for one router: the module plus how each procedure was shaped.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedContract {
    module: TsModule,
    shapes: Vec<(String, CallShape)>,
}

impl EmittedContract {
    pub fn module(&self) -> &TsModule {
        &self.module
    }

    /// The module source, without provenance header.
    pub fn body(&self) -> String {
        self.module.emit()
    }

    /// Emitted type declarations in order, excluding the router alias.
    pub fn declaration_names(&self) -> impl Iterator<Item = &str> {
        self.module.types.iter().map(|t| t.name.as_str())
    }

    /// Procedure name and call shape, in router order.
    pub fn shapes(&self) -> &[(String, CallShape)] {
        &self.shapes
    }
}

/// Build the contract for `router`. Does no I/O.
pub fn emit(router: &Router, config: &GeneratorConfig) -> Result<EmittedContract, SchemaError> {
    let mut mapper = TypeMapper::new(router);
    let mut entries = Vec::with_capacity(router.procedures().len());
    let mut shapes = Vec::with_capacity(router.procedures().len());

    for procedure in router.procedures() {
        let shape = classify(procedure);
        trace!(
            procedure = %procedure.name,
            kind = %procedure.kind,
            shape = %shape,
            "Classified procedure."
        );
        entries.push((
            procedure.name.clone(),
            codegen_procedure(procedure, shape, &mut mapper, config)?,
        ));
        shapes.push((procedure.name.clone(), shape));
    }
    mapper.declare_remaining()?;

    if let Some(owner) = mapper.registry().owner(&config.export_name) {
        return Err(SchemaError::DuplicateTypeIdentifier {
            ident: config.export_name.clone(),
            first: owner.to_string(),
            second: "the exported router type".to_string(),
        });
    }

    let module = TsModule {
        imports: vec![TsImport {
            items: vec!["initTRPC".to_string()],
            from: config.trpc_module.clone(),
        }],
        types: mapper.into_declarations(),
        body: codegen_router(entries, config),
        exports: vec![TsTypeDef {
            name: config.export_name.clone(),
            ty: TsType::TypeOf(config.router_ident.clone()),
        }],
    };

    debug!(
        procedures = shapes.len(),
        types = module.types.len(),
        "Emitted router contract."
    );

    Ok(EmittedContract { module, shapes })
}

/// `const t = initTRPC.create(); const publicProcedure = t.procedure; const appRouter = t.router({...});`
fn codegen_router(entries: Vec<(String, TsExpr)>, config: &GeneratorConfig) -> Vec<TsStmt> {
    vec![
        TsStmt::VarDecl {
            name: TRPC_ROOT.to_string(),
            init: TsExpr::ident("initTRPC").method("create", vec![]),
        },
        TsStmt::VarDecl {
            name: PROCEDURE_BUILDER.to_string(),
            init: TsExpr::ident(TRPC_ROOT).member("procedure"),
        },
        TsStmt::VarDecl {
            name: config.router_ident.clone(),
            init: TsExpr::ident(TRPC_ROOT).method(
                "router",
                vec![TsExpr::Object(entries)],
            ),
        },
    ]
}

/// `publicProcedure[.input(stub)][.output(stub)].query|mutation(stub)`
///
/// The call shape decides which sides are emitted.
fn codegen_procedure(
    procedure: &Procedure,
    shape: CallShape,
    mapper: &mut TypeMapper<'_>,
    config: &GeneratorConfig,
) -> Result<TsExpr, SchemaError> {
    let mut chain = TsExpr::ident(PROCEDURE_BUILDER);

    if shape.takes_input()
        && let Some(input) = &procedure.input
    {
        let ty = mapper.map_type(input)?;
        chain = chain.method("input", vec![stub("value", ty, config)]);
    }

    let output = match (shape.returns_value(), &procedure.output) {
        (true, Some(output)) => {
            let ty = mapper.map_type(output)?;
            chain = chain.method("output", vec![stub("value", ty.clone(), config)]);
            ty
        }
        _ => TsType::primitive(TsPrimitive::Void),
    };

    Ok(chain.method(shape.resolver(), vec![stub("opts", output, config)]))
}

/// `(param): ty => { throw new Error("...") }`
fn stub(param: &str, ty: TsType, config: &GeneratorConfig) -> TsExpr {
    TsExpr::Arrow {
        params: vec![TsParam::inferred(param)],
        return_type: ty,
        body: vec![TsStmt::Throw(TsExpr::New {
            callee: Box::new(TsExpr::ident("Error")),
            args: vec![TsExpr::Literal(TsLiteral::String(
                config.stub_message.clone(),
            ))],
        })],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::classify::IoShape;
    use crate::schema::{
        CompositeType, Field, ProcedureDef, ProcedureKind, RouterBuilder, TypeKey, TypeRef,
    };

    const THROW: &str = "{ throw new Error(\"Router should not be used\") }";

    fn router() -> Router {
        RouterBuilder::new()
            .composite(CompositeType::structure(
                TypeKey::new("User"),
                [
                    Field::new("id", TypeRef::number()),
                    Field::new("name", TypeRef::string()),
                    Field::new("nick", TypeRef::optional(TypeRef::string())),
                ],
            ))
            .procedure(
                ProcedureDef::query("get_user")
                    .input_fields([("user_id", TypeRef::number())])
                    .output(TypeRef::named("User")),
            )
            .procedure(ProcedureDef::query("get_server_time").output(TypeRef::number()))
            .procedure(
                ProcedureDef::mutation("add_numbers")
                    .input_fields([("first", TypeRef::number()), ("second", TypeRef::number())])
                    .output(TypeRef::number()),
            )
            .procedure(ProcedureDef::query("no_output").output(TypeRef::unit()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_declarations_follow_procedure_order() {
        let contract = emit(&router(), &GeneratorConfig::default()).unwrap();
        let names: Vec<_> = contract.declaration_names().collect();
        assert_eq!(names, vec!["GetUserInput", "User", "AddNumbersInput"]);
    }

    #[test]
    fn test_router_entries() {
        let body = emit(&router(), &GeneratorConfig::default()).unwrap().body();

        assert!(body.starts_with("import { initTRPC } from \"@trpc/server\";\n\n"));
        assert!(body.contains("const t = initTRPC.create();\n"));
        assert!(body.contains("const publicProcedure = t.procedure;\n"));
        assert!(body.contains(&format!(
            "  get_user: publicProcedure.input((value): GetUserInput => {THROW}).output((value): User => {THROW}).query((opts): User => {THROW}),\n"
        )));
        assert!(body.contains(&format!(
            "  get_server_time: publicProcedure.output((value): number => {THROW}).query((opts): number => {THROW}),\n"
        )));
        assert!(body.contains(&format!(
            "  add_numbers: publicProcedure.input((value): AddNumbersInput => {THROW}).output((value): number => {THROW}).mutation((opts): number => {THROW}),\n"
        )));
        assert!(body.contains(&format!(
            "  no_output: publicProcedure.query((opts): void => {THROW}),\n"
        )));
        assert!(body.ends_with("});\n\nexport type AppRouter = typeof appRouter;\n"));
    }

    #[test]
    fn test_shapes_recorded() {
        let contract = emit(&router(), &GeneratorConfig::default()).unwrap();
        let shapes: Vec<_> = contract
            .shapes()
            .iter()
            .map(|(name, shape)| (name.as_str(), shape.io))
            .collect();
        assert_eq!(
            shapes,
            vec![
                ("get_user", IoShape::InputOutput),
                ("get_server_time", IoShape::OutputOnly),
                ("add_numbers", IoShape::InputOutput),
                ("no_output", IoShape::Neither),
            ]
        );
    }

    #[test]
    fn test_config_names_flow_through() {
        let config = GeneratorConfig {
            trpc_module: "@trpc/server/unstable-core-do-not-import".to_string(),
            router_ident: "apiRouter".to_string(),
            export_name: "ApiRouter".to_string(),
            stub_message: "client only".to_string(),
        };
        let body = emit(&router(), &config).unwrap().body();
        assert!(body.contains("from \"@trpc/server/unstable-core-do-not-import\";"));
        assert!(body.contains("const apiRouter = t.router({\n"));
        assert!(body.contains("throw new Error(\"client only\")"));
        assert!(body.ends_with("export type ApiRouter = typeof apiRouter;\n"));
    }

    #[test]
    fn test_export_name_clashing_with_type() {
        let router = RouterBuilder::new()
            .composite(CompositeType::structure(TypeKey::new("AppRouter"), []))
            .procedure(ProcedureDef::query("x").output(TypeRef::named("AppRouter")))
            .build()
            .unwrap();
        let err = emit(&router, &GeneratorConfig::default()).unwrap_err();
        assert!(
            matches!(err, SchemaError::DuplicateTypeIdentifier { ident, .. } if ident == "AppRouter")
        );
    }

    #[test]
    fn test_procedure_name_is_quoted_when_needed() {
        let router = RouterBuilder::new()
            .procedure(ProcedureDef::query("users.list").output(TypeRef::list(TypeRef::string())))
            .build()
            .unwrap();
        let body = emit(&router, &GeneratorConfig::default()).unwrap().body();
        assert!(body.contains("  \"users.list\": publicProcedure.output((value): string[] => "));
    }

    #[test]
    fn test_call_shape_drives_emission() {
        let router = router();
        let procedure = router
            .procedures()
            .iter()
            .find(|p| p.name == "add_numbers")
            .unwrap();
        let shape = CallShape {
            kind: ProcedureKind::Mutation,
            io: IoShape::Neither,
        };
        let mut mapper = TypeMapper::new(&router);

        let expr = codegen_procedure(procedure, shape, &mut mapper, &GeneratorConfig::default())
            .unwrap();
        assert_eq!(
            expr.emit(),
            format!("publicProcedure.mutation((opts): void => {THROW})")
        );
        assert!(mapper.declarations().is_empty());
    }

    #[test]
    fn test_empty_router() {
        let router = RouterBuilder::new().build().unwrap();
        let body = emit(&router, &GeneratorConfig::default()).unwrap().body();
        assert!(body.contains("const appRouter = t.router({});\n"));
    }
}
