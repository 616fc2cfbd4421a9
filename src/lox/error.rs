
use thiserror::Error;

use super::{interpreter::RuntimeError, scanner::tokens::Token};

/// Lexical errors. They never stop the scan
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("[line {line}] Error: Unexpected character.")]
    UnexpectedCharacter { line: u32 },
    #[error("[line {line}] Error: Unterminated string.")]
    UnterminatedString { line: u32 },
}

/// A grammar violation, carrying the token the parser choked on
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[line {}] Error{}: {message}", .token.line, location(.token))]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl ParseError {
    pub fn new(token: &Token, message: &str) -> Self {
        Self {
            token: token.clone(),
            message: message.to_owned(),
        }
    }
}

fn location(token: &Token) -> String {
    if token.is_eof() {
        " at end".to_owned()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Collects the errors of one compilation unit. Every report is echoed to stderr as it arrives
/// unless the collector was created with `silent`.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<CompileError>,
    had_runtime_error: bool,
    silent: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// a collector that records without writing anything
    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::default()
        }
    }

    pub fn report_scan(&mut self, error: ScanError) {
        self.report(error.into());
    }

    pub fn report_parse(&mut self, error: ParseError) {
        self.report(error.into());
    }

    fn report(&mut self, error: CompileError) {
        self.emit(&error.to_string());
        self.errors.push(error);
    }

    pub fn report_runtime(&mut self, error: RuntimeError) {
        self.emit(&error.to_string());
        self.had_runtime_error = true;
    }

    fn emit(&self, message: &str) {
        if self.silent {
            return;
        }
        eprintln!("{message}");
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    /// clear both flags, used between interactive lines
    pub fn reset(&mut self) {
        self.errors.clear();
        self.had_runtime_error = false;
    }
}
