//! vibe entry point: parses CLI args and either runs a script or starts
//! the REPL.

fn main() {
    if let Err(err) = vibe::cli::run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
