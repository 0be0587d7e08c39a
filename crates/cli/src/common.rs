use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use juno_codegen::config::CONFIG_FILENAME;
use juno_codegen::{GenerateError, GeneratorConfig, Router, schema};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read schema {}: {source}", .path.display())]
    ReadSchema {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("--check compares against a file; `--out -` has nothing to compare")]
    CheckStream,

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Explicit `--config`, else `juno.toml` next to the schema, else defaults.
pub fn resolve_config(
    explicit: Option<&Path>,
    schema_path: &Path,
) -> Result<GeneratorConfig, CliError> {
    if let Some(path) = explicit {
        return Ok(GeneratorConfig::load(path).map_err(GenerateError::from)?);
    }

    let sibling = schema_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(CONFIG_FILENAME);
    if sibling.is_file() {
        debug!(path = %sibling.display(), "Using config found next to the schema.");
        return Ok(GeneratorConfig::load(&sibling).map_err(GenerateError::from)?);
    }

    Ok(GeneratorConfig::default())
}

pub fn load_router(schema_path: &Path) -> Result<Router, CliError> {
    let source = fs::read_to_string(schema_path).map_err(|source| CliError::ReadSchema {
        path: schema_path.to_path_buf(),
        source,
    })?;
    debug!(
        schema = %schema_path.display(),
        source_len = source.len(),
        "Read procedure schema."
    );
    Ok(schema::load(&source).map_err(GenerateError::from)?)
}
