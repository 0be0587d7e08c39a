//! Generator settings, optionally loaded from `juno.toml`.
//!
//! Settings may live at the top level of the file or under a `[codegen]` table:
//!
//! ```toml
//! [codegen]
//! router_ident = "apiRouter"
//! export_name = "ApiRouter"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::ts::utils::is_declarable_type_name;

/// Default config filename looked up next to the schema.
pub const CONFIG_FILENAME: &str = "juno.toml";
const CODEGEN_TABLE: &str = "codegen";
/// Bindings the emitted module declares itself.
const EMITTED_BINDINGS: [&str; 3] = ["initTRPC", "t", "publicProcedure"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Module `initTRPC` is imported from.
    pub trpc_module: String,
    /// Name of the router constant.
    pub router_ident: String,
    /// Name of the exported router type alias.
    pub export_name: String,
    /// Message thrown by every stub resolver.
    pub stub_message: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            trpc_module: "@trpc/server".to_string(),
            router_ident: "appRouter".to_string(),
            export_name: "AppRouter".to_string(),
            stub_message: "Router should not be used".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table = toml::from_str(contents)?;
        let config: Self = match table.remove(CODEGEN_TABLE) {
            Some(section) => section.try_into()?,
            None => toml::Value::Table(table).try_into()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), ?config, "Loaded generator config.");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("router_ident", &self.router_ident),
            ("export_name", &self.export_name),
        ] {
            if !is_declarable_type_name(value) || EMITTED_BINDINGS.contains(&value.as_str()) {
                return Err(ConfigError::InvalidIdentifier {
                    key,
                    value: value.clone(),
                });
            }
        }
        if self.trpc_module.is_empty() {
            return Err(ConfigError::Empty { key: "trpc_module" });
        }
        Ok(())
    }
}
