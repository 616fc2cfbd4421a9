use anyhow::Result;
use std::fs::read_to_string;
use std::io::{self, Write};
use std::path::Path;

use ast::{printer::AstEmitter, Stmt};
use config::{Config, Emit};
use error::Diagnostics;
use interpreter::{Interpreter, RuntimeError};
use parser::Parser;
use scanner::Scanner;

pub mod ast;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod scanner;

/// wrong number of command line arguments
pub const EX_USAGE: i32 = 64;
/// the script failed to scan or parse
pub const EX_DATAERR: i32 = 65;
/// the script failed while running
pub const EX_SOFTWARE: i32 = 70;

/// Whatever consumes a unit once it has parsed without errors
pub trait Backend {
    fn execute(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError>;
}

/// How a batch run ended. Compile errors take priority over runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    CompileError,
    RuntimeError,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::CompileError => EX_DATAERR,
            Outcome::RuntimeError => EX_SOFTWARE,
        }
    }
}

impl From<&Diagnostics> for Outcome {
    fn from(diagnostics: &Diagnostics) -> Self {
        if diagnostics.had_error() {
            Outcome::CompileError
        } else if diagnostics.had_runtime_error() {
            Outcome::RuntimeError
        } else {
            Outcome::Success
        }
    }
}

/// Runs source through scanner, parser and backend. Token dumps stop after scanning and
/// have no backend
pub struct Lox {
    config: Config,
    backend: Option<Box<dyn Backend>>,
}

impl Lox {
    pub fn new(config: Config) -> Self {
        let backend: Option<Box<dyn Backend>> = match config.emit {
            Emit::Ast => Some(Box::new(AstEmitter::stdout())),
            Emit::Eval => Some(Box::new(Interpreter::stdout())),
            Emit::Tokens => None,
        };
        Self { config, backend }
    }

    pub fn with_backend(config: Config, backend: Box<dyn Backend>) -> Self {
        Self {
            config,
            backend: Some(backend),
        }
    }

    pub fn run_file(&mut self, path: &Path) -> Result<Outcome> {
        let source = read_to_string(path)?;
        self.run_source(&source)
    }

    /// run one whole unit with its own diagnostics
    pub fn run_source(&mut self, source: &str) -> Result<Outcome> {
        let mut diagnostics = Diagnostics::new();
        self.run(source, &mut diagnostics)?;
        Ok(Outcome::from(&diagnostics))
    }

    /// Read and run one line at a time until stdin runs out. Mistakes are reported and
    /// forgotten so the session carries on
    pub fn run_prompt(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut diagnostics = Diagnostics::new();
        loop {
            print!("> ");
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.read_line(&mut line)? == 0 {
                break;
            }
            self.run(&line, &mut diagnostics)?;
            diagnostics.reset();
        }
        Ok(())
    }

    /// Errors from every stage land in `diagnostics`. The backend only sees units that scanned
    /// and parsed cleanly
    pub fn run(&mut self, source: &str, diagnostics: &mut Diagnostics) -> Result<()> {
        let tokens = Scanner::new(source)
            .with_legacy_or(self.config.legacy_or)
            .scan_tokens(diagnostics);

        let Some(backend) = self.backend.as_mut() else {
            let mut out = io::stdout().lock();
            for token in &tokens {
                writeln!(out, "{token}")?;
            }
            return Ok(());
        };

        let statements = Parser::new(tokens).parse(diagnostics);
        if diagnostics.had_error() {
            return Ok(());
        }

        if let Err(e) = backend.execute(&statements) {
            diagnostics.report_runtime(e);
        }
        Ok(())
    }
}
