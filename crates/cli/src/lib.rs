use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod check;
mod common;
mod generate;

#[derive(Parser)]
#[command(
    name = "juno",
    version,
    about = "Generate typed tRPC router contracts from a procedure table"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the router contract and write it to a file
    Generate(generate::GenerateArgs),
    /// Validate a procedure table without writing anything
    Check(check::CheckArgs),
}

/// Parse `args` (including the binary name) and run the selected command.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => generate::run(args),
            Some(Commands::Check(args)) => check::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

pub fn init_tracing() {
    // JUNO_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "juno_codegen=trace"
    let filter = match std::env::var("JUNO_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("juno_cli={level},juno_codegen={level}")
        }
        Ok(spec) => spec,
        Err(_) => "juno_cli=info,juno_codegen=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
