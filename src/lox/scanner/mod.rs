use std::collections::HashMap;

use once_cell::sync::Lazy;
use tokens::{LiteralValue, Token, TokenType};

use super::error::{Diagnostics, ScanError};

pub mod tokens;

static KEYWORDS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    HashMap::from([
        ("and", TokenType::And),
        ("class", TokenType::Class),
        ("else", TokenType::Else),
        ("false", TokenType::False),
        ("for", TokenType::For),
        ("fun", TokenType::Fun),
        ("if", TokenType::If),
        ("nil", TokenType::Nil),
        ("or", TokenType::Or),
        ("print", TokenType::Print),
        ("return", TokenType::Return),
        ("super", TokenType::Super),
        ("this", TokenType::This),
        ("true", TokenType::True),
        ("var", TokenType::Var),
        ("while", TokenType::While),
    ])
});

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}

pub struct Scanner {
    source: Vec<char>,
    tokens: Vec<Token>,
    // first character in current lexeme
    start: usize,
    // current character
    current: usize,
    // current line
    line: u32,
    // line the current lexeme starts on
    start_line: u32,
    legacy_or: bool,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
            start_line: 1,
            legacy_or: false,
        }
    }

    /// Scan `o` followed by `r` as a one-character `Or` token, the way the first version of the
    /// scanner did. Any other `o` that starts a lexeme is dropped.
    pub fn with_legacy_or(mut self, legacy_or: bool) -> Self {
        self.legacy_or = legacy_or;
        self
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }

    /// consume the next character only if it is `target`
    fn match_next(&mut self, target: char) -> bool {
        if self.is_at_end() || self.source[self.current] != target {
            return false;
        }
        self.current += 1;
        true
    }

    // converts current lexeme from slice of chars to String
    fn current_to_string(&self) -> String {
        String::from_iter(&self.source[self.start..self.current])
    }

    fn add_token(&mut self, token_type: TokenType, literal: Option<LiteralValue>) {
        let lexeme = self.current_to_string();
        self.tokens.push(Token::new(token_type, lexeme, literal, self.start_line));
    }

    fn scan_token(&mut self) -> Result<(), ScanError> {
        let c = self.advance();
        match c {
            // single-character tokens
            '(' => self.add_token(TokenType::LeftParen, None),
            ')' => self.add_token(TokenType::RightParen, None),
            '{' => self.add_token(TokenType::LeftBrace, None),
            '}' => self.add_token(TokenType::RightBrace, None),
            ',' => self.add_token(TokenType::Comma, None),
            '.' => self.add_token(TokenType::Dot, None),
            '-' => self.add_token(TokenType::Minus, None),
            '+' => self.add_token(TokenType::Plus, None),
            ';' => self.add_token(TokenType::Semicolon, None),
            '*' => self.add_token(TokenType::Star, None),

            // one-or-two character tokens
            '!' => {
                let token_type = if self.match_next('=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.add_token(token_type, None)
            }
            '=' => {
                let token_type = if self.match_next('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.add_token(token_type, None)
            }
            '>' => {
                let token_type = if self.match_next('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.add_token(token_type, None)
            }
            '<' => {
                let token_type = if self.match_next('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.add_token(token_type, None)
            }

            '/' => {
                // double slash means comment, which runs up to the newline
                if self.match_next('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash, None)
                }
            }

            '"' => self.string()?,

            'o' if self.legacy_or => {
                if self.peek() == 'r' {
                    self.add_token(TokenType::Or, None)
                }
            }

            // increment line number on new-line
            '\n' => self.line += 1,
            // ignore irrelevant chars
            '\r' | ' ' | '\t' => {}
            c if is_digit(c) => self.number(),
            c if is_alpha(c) => self.identifier(),
            _ => return Err(ScanError::UnexpectedCharacter { line: self.line }),
        }
        Ok(())
    }

    fn string(&mut self) -> Result<(), ScanError> {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            return Err(ScanError::UnterminatedString { line: self.line });
        }
        // account for closing quote mark
        self.advance();
        let val = String::from_iter(&self.source[self.start + 1..self.current - 1]);
        self.add_token(TokenType::String, Some(LiteralValue::String(val)));
        Ok(())
    }

    fn number(&mut self) {
        while is_digit(self.peek()) {
            self.advance();
        }

        // a trailing '.' is only part of the number when a digit follows it
        if self.peek() == '.' && is_digit(self.peek_next()) {
            self.advance();
            while is_digit(self.peek()) {
                self.advance();
            }
        }

        // digits with at most one interior '.' always parse
        let val = self.current_to_string().parse::<f64>().unwrap_or_default();
        self.add_token(TokenType::Number, Some(LiteralValue::Number(val)))
    }

    fn identifier(&mut self) {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }

        let text = self.current_to_string();
        let token_type = KEYWORDS
            .get(text.as_str())
            .copied()
            .unwrap_or(TokenType::Identifier);
        let literal = match token_type {
            TokenType::True => Some(LiteralValue::Boolean(true)),
            TokenType::False => Some(LiteralValue::Boolean(false)),
            TokenType::Nil => Some(LiteralValue::Nil),
            _ => None,
        };
        self.add_token(token_type, literal);
    }

    /// Scan the whole source. Errors go to `diagnostics` and scanning carries on, so the
    /// returned tokens always end with exactly one `Eof`
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_line = self.line;
            if let Err(e) = self.scan_token() {
                diagnostics.report_scan(e);
            }
        }

        let eof = Token::new(TokenType::Eof, String::new(), None, self.line);
        self.tokens.push(eof);
        self.tokens
    }
}
