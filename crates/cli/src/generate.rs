use clap::Args;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use juno_codegen::writer::{self, WriteOutcome};
use juno_codegen::{GenerateError, codegen};
use tracing::{debug, warn};

use crate::common::{CliError, load_router, resolve_config};

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// JSON procedure table
    #[arg(long, value_name = "SCHEMA_JSON")]
    pub schema: PathBuf,
    /// Output file, or `-` for stdout
    #[arg(long, value_name = "OUT_TS")]
    pub out: PathBuf,
    /// Generator config (defaults to juno.toml next to the schema)
    #[arg(long, value_name = "CONFIG_TOML")]
    pub config: Option<PathBuf>,
    /// Fail instead of writing when the output would change
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Regenerated,
    Unchanged,
    Changed,
    Streamed,
}

pub fn run(args: GenerateArgs) -> i32 {
    match generate(&args) {
        Ok(Status::Streamed) => 0,
        Ok(Status::Regenerated) => {
            println!("regenerated");
            0
        }
        Ok(Status::Unchanged) => {
            println!("unchanged");
            0
        }
        Ok(Status::Changed) => {
            println!("changed");
            1
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn generate(args: &GenerateArgs) -> Result<Status, CliError> {
    let streaming = args.out.as_os_str() == writer::STREAM_LABEL;
    if streaming && args.check {
        return Err(CliError::CheckStream);
    }

    let config = resolve_config(args.config.as_deref(), &args.schema)?;
    config.validate().map_err(GenerateError::from)?;
    let router = load_router(&args.schema)?;
    let contract = codegen::emit(&router, &config).map_err(GenerateError::from)?;

    if streaming {
        writer::write(&contract, io::stdout().lock()).map_err(GenerateError::from)?;
        return Ok(Status::Streamed);
    }

    if args.check {
        let rendered = writer::render(&contract);
        let up_to_date = writer::is_up_to_date(&rendered, &args.out).map_err(GenerateError::from)?;
        return Ok(if up_to_date {
            Status::Unchanged
        } else {
            Status::Changed
        });
    }

    warn_if_hand_edited(&args.out);
    let outcome = writer::write_to_path(&contract, &args.out).map_err(GenerateError::from)?;
    debug!(out = %args.out.display(), ?outcome, "Generate finished.");
    Ok(match outcome {
        WriteOutcome::Written => Status::Regenerated,
        WriteOutcome::Unchanged => Status::Unchanged,
    })
}

fn warn_if_hand_edited(path: &Path) {
    if let Ok(existing) = fs::read_to_string(path)
        && !writer::is_pristine(&existing)
    {
        warn!(
            path = %path.display(),
            "Existing file is not untouched generated output; overwriting it."
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::common::fixtures::SCHEMA;

    fn args(dir: &Path) -> GenerateArgs {
        let schema = dir.join("schema.json");
        fs::write(&schema, SCHEMA).unwrap();
        GenerateArgs {
            schema,
            out: dir.join("client").join("server.ts"),
            config: None,
            check: false,
        }
    }

    #[test]
    fn test_generate_then_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path());

        assert_eq!(generate(&args).unwrap(), Status::Regenerated);
        let written = fs::read_to_string(&args.out).unwrap();
        assert!(written.contains("export type GetUserInput = { user_id: number };"));
        assert!(written.contains("export type AppRouter = typeof appRouter;"));

        assert_eq!(generate(&args).unwrap(), Status::Unchanged);
        assert_eq!(run(args), 0);
    }

    #[test]
    fn test_check_mode_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.check = true;

        assert_eq!(generate(&args).unwrap(), Status::Changed);
        assert!(!args.out.exists());
        assert_eq!(run(args.clone()), 1);

        args.check = false;
        generate(&args).unwrap();
        args.check = true;
        assert_eq!(generate(&args).unwrap(), Status::Unchanged);
    }

    #[test]
    fn test_check_against_stdout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.out = PathBuf::from("-");
        args.check = true;

        assert!(matches!(generate(&args), Err(CliError::CheckStream)));
        assert_eq!(run(args), 1);
    }

    #[test]
    fn test_config_next_to_schema_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path());
        fs::write(
            dir.path().join("juno.toml"),
            "[codegen]\nrouter_ident = \"apiRouter\"\nexport_name = \"ApiRouter\"\n",
        )
        .unwrap();

        generate(&args).unwrap();
        let written = fs::read_to_string(&args.out).unwrap();
        assert!(written.contains("export type ApiRouter = typeof apiRouter;"));
    }

    #[test]
    fn test_hand_edited_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path());
        fs::create_dir_all(args.out.parent().unwrap()).unwrap();
        fs::write(&args.out, "export type AppRouter = any;\n").unwrap();

        assert_eq!(generate(&args).unwrap(), Status::Regenerated);
        assert!(writer::is_pristine(&fs::read_to_string(&args.out).unwrap()));
    }

    #[test]
    fn test_invalid_schema_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path());
        fs::write(&args.schema, r#"{ "procedures": [{ "name": "x", "kind": "query", "output": { "ref": "Nope" } }] }"#)
            .unwrap();

        assert!(generate(&args).is_err());
        assert!(!args.out.exists());
        assert_eq!(run(args), 1);
    }
}
