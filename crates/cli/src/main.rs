fn main() {
    juno_cli::init_tracing();
    std::process::exit(juno_cli::run_cli(std::env::args_os()));
}
