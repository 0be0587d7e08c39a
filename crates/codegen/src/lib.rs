//! Procedure table to tRPC router contract generator.
//!
//! Given the procedures a backend exposes, this crate writes a TypeScript
//! module whose exported `AppRouter` type lets a tRPC client call the backend
//! with full static typing. The pipeline is:
//! 1. Load: JSON source or [`RouterBuilder`] -> [`Router`] (validated and closed)
//! 2. Map: schema types -> TypeScript types, dependencies first
//! 3. Classify: each procedure -> its call shape
//! 4. Emit: Router -> TsModule (stub router plus exported type alias)
//! 5. Write: TsModule -> provenance-stamped source, atomically

pub mod classify;
pub mod codegen;
pub mod config;
pub mod error;
pub mod mapper;
pub mod schema;
pub mod ts;
pub mod writer;

use std::path::Path;

pub use codegen::EmittedContract;
pub use config::GeneratorConfig;
pub use error::{ConfigError, GenerateError, SchemaError, WriteError};
pub use schema::{Router, RouterBuilder};
pub use writer::WriteOutcome;

/// Generate the rendered client for a JSON procedure table.
pub fn generate(source_json: &str, config: &GeneratorConfig) -> Result<String, GenerateError> {
    let router = schema::load(source_json)?;
    generate_router(&router, config)
}

/// Generate the rendered client for an already validated router.
pub fn generate_router(router: &Router, config: &GeneratorConfig) -> Result<String, GenerateError> {
    config.validate()?;
    let contract = codegen::emit(router, config)?;
    Ok(writer::render(&contract))
}

/// Generate the client for `router` and write it to `path`.
pub fn write_client(
    router: &Router,
    config: &GeneratorConfig,
    path: &Path,
) -> Result<WriteOutcome, GenerateError> {
    config.validate()?;
    let contract = codegen::emit(router, config)?;
    Ok(writer::write_to_path(&contract, path)?)
}
