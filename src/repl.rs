//! Interactive read-eval-print loop, per §6's external-interface notes.
//!
//! Input is accumulated line by line until the count of block-opening
//! tokens (`for`, `if`, `def`, `class`, `while`, an unclosed `[`) no longer
//! exceeds the count of block-closing tokens (`end`, `]`), so a multi-line
//! `if ... do ... end` can be typed across several prompts. The mandatory
//! `do` that follows each opener is not itself counted.
//! `exit`/`quit` typed alone at a fresh prompt end the session.

use std::io::{self, BufRead, Write};

use crate::builtins::register_builtins;
use crate::environment::Env;
use crate::intern::Interner;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser;
use crate::token::TokenKind;

/// A REPL session: an interner and root environment that persist across
/// evaluations, so a variable bound on one line is visible on the next.
pub struct Repl {
    interner: Interner,
    env: Env,
}

impl Repl {
    pub fn new() -> Self {
        let env = Env::root();
        register_builtins(&env);
        Repl { interner: Interner::new(), env }
    }

    /// Parse and evaluate `source` against this session's persistent
    /// environment, returning the text to print (empty if nothing is worth
    /// showing). Parser diagnostics are reported instead of being evaluated.
    pub fn eval(&mut self, source: &str) -> String {
        let (program, diagnostics) = parser::parse(source, &mut self.interner);
        if !diagnostics.is_empty() {
            return diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n");
        }
        let interpreter = Interpreter::new(&self.interner);
        let value = interpreter.eval_program(&program, &self.env);
        match value {
            crate::value::Value::Nil => String::new(),
            other => other.inspect(),
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `source` still has unmatched block openers and should be
/// accumulated further before being handed to `Repl::eval`. Uses a
/// throwaway interner since only token kinds matter here, not identities.
fn needs_more_input(source: &str) -> bool {
    let mut scratch = Interner::new();
    let mut lexer = Lexer::new(source, &mut scratch);
    let mut depth: i32 = 0;
    loop {
        let tok = lexer.next_token();
        match tok.kind {
            TokenKind::Eof => break,
            TokenKind::For
            | TokenKind::If
            | TokenKind::Def
            | TokenKind::Class
            | TokenKind::While
            | TokenKind::LBracket => depth += 1,
            TokenKind::End | TokenKind::RBracket => depth -= 1,
            _ => {}
        }
    }
    depth > 0
}

/// Drive the REPL against stdin/stdout until EOF or an `exit`/`quit` command.
pub fn run() -> io::Result<()> {
    let mut repl = Repl::new();
    let stdin = io::stdin();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        print!("{}", if buffer.is_empty() { "vibe> " } else { "...   " });
        io::stdout().flush()?;

        let mut line = String::new();
        if handle.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        if buffer.is_empty() && matches!(line.trim(), "exit" | "quit") {
            break;
        }

        buffer.push_str(&line);
        if needs_more_input(&buffer) {
            continue;
        }

        let output = repl.eval(&buffer);
        if !output.is_empty() {
            println!("{}", output);
        }
        buffer.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_bindings_across_evaluations() {
        let mut repl = Repl::new();
        repl.eval("let x: int = 10;");
        assert_eq!(repl.eval("x + 5"), "15");
    }

    #[test]
    fn reports_parser_diagnostics_instead_of_evaluating() {
        let mut repl = Repl::new();
        let output = repl.eval("let x: int = ;");
        assert!(output.contains("Parser error"));
    }

    #[test]
    fn unclosed_if_block_needs_more_input() {
        assert!(needs_more_input("if x > 0 do\n  puts x\n"));
    }

    #[test]
    fn balanced_block_does_not_need_more_input() {
        assert!(!needs_more_input("if x > 0 do\n  puts x\nend\n"));
    }

    #[test]
    fn unclosed_array_literal_needs_more_input() {
        assert!(needs_more_input("let xs = [1, 2,"));
    }

    #[test]
    fn nil_result_prints_nothing() {
        let mut repl = Repl::new();
        assert_eq!(repl.eval("puts \"hi\""), "");
    }
}
