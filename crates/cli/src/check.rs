use clap::Args;
use std::path::PathBuf;

use juno_codegen::{GenerateError, codegen};
use tracing::info;

use crate::common::{CliError, load_router, resolve_config};

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// JSON procedure table
    #[arg(long, value_name = "SCHEMA_JSON")]
    pub schema: PathBuf,
    /// Generator config (defaults to juno.toml next to the schema)
    #[arg(long, value_name = "CONFIG_TOML")]
    pub config: Option<PathBuf>,
}

pub fn run(args: CheckArgs) -> i32 {
    match check(&args) {
        Ok((procedures, types)) => {
            println!("ok: {procedures} procedures, {types} types");
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Runs every generation stage short of rendering so identifier collisions surface too.
fn check(args: &CheckArgs) -> Result<(usize, usize), CliError> {
    let config = resolve_config(args.config.as_deref(), &args.schema)?;
    config.validate().map_err(GenerateError::from)?;
    let router = load_router(&args.schema)?;
    let contract = codegen::emit(&router, &config).map_err(GenerateError::from)?;

    for (name, shape) in contract.shapes() {
        info!(procedure = %name, shape = %shape, "Procedure ok.");
    }
    Ok((
        contract.shapes().len(),
        contract.declaration_names().count(),
    ))
}
