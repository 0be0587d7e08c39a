use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A schema-integrity problem. Every variant is fatal to the generation run:
/// nothing is written when one is returned.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse procedure schema: {0}")]
    InvalidSource(#[from] serde_json::Error),

    #[error("type `{name}` referenced by {referrer} is not defined")]
    UnresolvedTypeReference { name: String, referrer: String },

    #[error("procedure `{name}` is registered more than once")]
    DuplicateProcedureName { name: String },

    #[error("type identifier `{ident}` is claimed by both `{first}` and `{second}`")]
    DuplicateTypeIdentifier {
        ident: String,
        first: String,
        second: String,
    },

    #[error("field `{field}` appears more than once in `{owner}`")]
    DuplicateField { owner: String, field: String },

    #[error("variant \"{variant}\" appears more than once in enum `{owner}`")]
    DuplicateVariant { owner: String, variant: String },

    #[error("`{value}` is not a usable TypeScript identifier for {what}")]
    InvalidIdentifier { what: String, value: String },

    #[error("unknown primitive type `{name}`")]
    UnknownPrimitive { name: String },

    #[error("type `{name}` {reason}")]
    InvalidComposite { name: String, reason: &'static str },
}

/// Failure to deliver generated source to its sink.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write generated client to {}: {source}", .path.display())]
    SinkWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WriteError {
    pub(crate) fn sink(path: impl Into<PathBuf>, source: io::Error) -> Self {
        WriteError::SinkWriteFailure {
            path: path.into(),
            source,
        }
    }
}

/// Problems reading or validating a `juno.toml` generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config key `{key}` must be a valid TypeScript identifier, got `{value}`")]
    InvalidIdentifier { key: &'static str, value: String },

    #[error("config key `{key}` must not be empty")]
    Empty { key: &'static str },
}

/// Top-level error returned by the generation entry points.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
