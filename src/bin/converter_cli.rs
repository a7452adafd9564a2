use converter_core::cli::run_cli;

fn main() {
    // Tracing is initialised by the shell once the saved log filter is known.
    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
