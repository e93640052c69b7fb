//! Command-line interface: run a `.vi` script, or drop into the REPL.

use std::path::PathBuf;

use clap::Parser;

use crate::builtins::register_builtins;
use crate::environment::Env;
use crate::intern::Interner;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// A tree-walking interpreter for the vibe scripting language.
#[derive(Parser, Debug)]
#[command(name = "vibe", version, about)]
struct Cli {
    /// Script to run. `.vi` is appended if the name carries no extension.
    program: Option<String>,

    /// Drop into the interactive REPL instead of (or after) running a script.
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Print the parsed program before executing it.
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .try_init()
        .ok();

    let Some(program) = cli.program.as_deref() else {
        return crate::repl::run().map_err(Into::into);
    };

    let path = resolve_script_path(program);
    tracing::debug!(path = %path.display(), "loading script");
    let source = std::fs::read_to_string(&path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

    let mut interner = Interner::new();
    let (ast, diagnostics) = crate::parser::parse(&source, &mut interner);
    if !diagnostics.is_empty() {
        for diagnostic in &diagnostics {
            eprintln!("{}", diagnostic);
        }
        std::process::exit(1);
    }
    if cli.debug {
        eprintln!("{:#?}", ast);
    }

    let env = Env::root();
    register_builtins(&env);
    let interpreter = Interpreter::new(&interner);
    let result = interpreter.eval_program(&ast, &env);
    if let Value::Error(message) = &result {
        eprintln!("Runtime error: {}", message);
        std::process::exit(1);
    }

    if cli.interactive {
        crate::repl::run()?;
    }

    Ok(())
}

fn resolve_script_path(program: &str) -> PathBuf {
    let mut path = PathBuf::from(program);
    if path.extension().is_none() {
        path.set_extension("vi");
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_script_path_appends_default_extension() {
        assert_eq!(resolve_script_path("hello"), PathBuf::from("hello.vi"));
    }

    #[test]
    fn resolve_script_path_leaves_explicit_extension_alone() {
        assert_eq!(resolve_script_path("hello.vi"), PathBuf::from("hello.vi"));
        assert_eq!(resolve_script_path("hello.txt"), PathBuf::from("hello.txt"));
    }
}
