use super::{
    ast::{Binary, Expr, Grouping, Literal, PrintExpression, PureExpression, Stmt, Unary},
    error::{Diagnostics, ParseError},
    scanner::tokens::{LiteralValue, Token, TokenType},
};

pub struct Parser {
    current: usize,
    tokens: Vec<Token>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        // everything below relies on the stream ending in Eof
        if !tokens.last().is_some_and(Token::is_eof) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::new(TokenType::Eof, String::new(), None, line));
        }
        Parser { current: 0, tokens }
    }

    /// Parse the whole unit. A statement that fails is reported, skipped up to the next
    /// statement boundary and left out of the result
    pub fn parse(&mut self, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
        let mut statements = vec![];
        while !self.is_at_end() {
            match self.statement() {
                Ok(statement) => statements.push(statement),
                Err(e) => {
                    diagnostics.report_parse(e);
                    self.synchronize();
                }
            }
        }
        statements
    }

    /// parse a single expression with no terminating `;`
    pub fn parse_expression(&mut self, diagnostics: &mut Diagnostics) -> Option<Expr> {
        match self.expression() {
            Ok(expr) => Some(expr),
            Err(e) => {
                diagnostics.report_parse(e);
                None
            }
        }
    }

    /// advance our current position in the token stream by 1, never past Eof
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// get the next token without advancing
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    fn check(&self, token_type: TokenType) -> bool {
        !self.is_at_end() && self.peek().token_type == token_type
    }

    /// if the next token is in targets, advance and return true otherwise return false
    fn match_token(&mut self, targets: &[TokenType]) -> bool {
        if targets.iter().any(|t| self.check(*t)) {
            self.advance();
            return true;
        }
        false
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<&Token, ParseError> {
        if self.check(token_type) {
            return Ok(self.advance());
        }
        Err(ParseError::new(self.peek(), message))
    }

    /// Discard tokens until we're probably at the start of the next statement
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().token_type == TokenType::Semicolon {
                return;
            }
            if self.peek().token_type.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.match_token(&[TokenType::Print]) {
            return self.print_statement();
        }
        self.expression_statement()
    }

    fn print_statement(&mut self) -> Result<Stmt, ParseError> {
        let value = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(PrintExpression(value)))
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(PureExpression(expr)))
    }

    /// parse an expression
    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.equality()
    }

    /// parse an equality or anything of higher precedence
    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.comparison()?;
        while self.match_token(&[TokenType::BangEqual, TokenType::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(Binary::new(expr, operator, right));
        }
        Ok(expr)
    }

    /// parse a comparison or anything of higher precedence
    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.term()?;

        while self.match_token(&[
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Less,
            TokenType::LessEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(Binary::new(expr, operator, right));
        }
        Ok(expr)
    }

    /// parse a term or anything of higher precedence
    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.factor()?;

        while self.match_token(&[TokenType::Minus, TokenType::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(Binary::new(expr, operator, right));
        }
        Ok(expr)
    }

    /// parse a factor or anything of higher precedence
    fn factor(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary()?;

        while self.match_token(&[TokenType::Slash, TokenType::Star]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(Binary::new(expr, operator, right));
        }
        Ok(expr)
    }

    /// parse a unary expression or anything of higher precedence. Recursing on the operand makes
    /// prefix operators nest to the right
    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.match_token(&[TokenType::Bang, TokenType::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary(Unary::new(operator, right)));
        }
        self.primary()
    }

    /// parse a primary expression
    fn primary(&mut self) -> Result<Expr, ParseError> {
        if self.match_token(&[TokenType::False]) {
            return Ok(Expr::Literal(Literal(LiteralValue::Boolean(false))));
        }
        if self.match_token(&[TokenType::True]) {
            return Ok(Expr::Literal(Literal(LiteralValue::Boolean(true))));
        }
        if self.match_token(&[TokenType::Nil]) {
            return Ok(Expr::Literal(Literal(LiteralValue::Nil)));
        }

        if self.match_token(&[TokenType::Number, TokenType::String]) {
            let token = self.previous();
            return match &token.literal {
                Some(value) => Ok(Expr::Literal(Literal(value.clone()))),
                None => Err(ParseError::new(token, "Expected expression.")),
            };
        }

        if self.match_token(&[TokenType::LeftParen]) {
            let expr = self.expression()?;
            self.consume(TokenType::RightParen, "Expected ')' after expression.")?;
            return Ok(Expr::Grouping(Grouping(Box::new(expr))));
        }

        Err(ParseError::new(self.peek(), "Expected expression."))
    }
}

#[cfg(test)]
mod tests {
    use crate::lox::{ast::printer::Printer, scanner::Scanner};

    use super::*;

    fn parse(source: &str) -> (Vec<Stmt>, Diagnostics) {
        let mut diagnostics = Diagnostics::silent();
        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);
        (statements, diagnostics)
    }

    fn print_expression(source: &str) -> String {
        let mut diagnostics = Diagnostics::silent();
        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let expr = Parser::new(tokens)
            .parse_expression(&mut diagnostics)
            .expect("expression should parse");
        assert!(!diagnostics.had_error());
        Printer.print(&expr)
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.errors().iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_parser() {
        let toks = vec![
            Token::new(
                TokenType::Number,
                "3".to_string(),
                Some(LiteralValue::Number(3.0)),
                1,
            ),
            Token::new(TokenType::Minus, "-".to_string(), None, 1),
            Token::new(
                TokenType::Number,
                "2".to_string(),
                Some(LiteralValue::Number(2.0)),
                1,
            ),
        ];

        let mut diagnostics = Diagnostics::silent();
        let mut parser = Parser::new(toks);
        let ast = parser.parse_expression(&mut diagnostics).unwrap();
        assert_eq!(Printer.print(&ast), "(- 3 2)");
    }

    #[test]
    fn test_precedence() {
        let mut diagnostics = Diagnostics::silent();
        let tokens = Scanner::new("1 + 2 * 3").scan_tokens(&mut diagnostics);
        let expr = Parser::new(tokens).parse_expression(&mut diagnostics);

        let Some(Expr::Binary(root)) = expr else {
            panic!("expected a binary root");
        };
        assert_eq!(root.operator.token_type, TokenType::Plus);
        assert_eq!(
            *root.left,
            Expr::Literal(Literal(LiteralValue::Number(1.0)))
        );
        let Expr::Binary(right) = root.right.as_ref() else {
            panic!("expected a binary right child");
        };
        assert_eq!(right.operator.token_type, TokenType::Star);
        assert_eq!(print_expression("1 + 2 * 3"), "(+ 1 (* 2 3))");
    }

    #[test]
    fn test_layers() {
        assert_eq!(
            print_expression("1 == 2 < 3 + 4 / 5"),
            "(== 1 (< 2 (+ 3 (/ 4 5))))"
        );
        assert_eq!(
            print_expression("!true != false >= nil"),
            "(!= (! true) (>= false nil))"
        );
        assert_eq!(print_expression("\"a\" + \"b\""), "(+ a b)");
    }

    #[test]
    fn test_associativity() {
        assert_eq!(print_expression("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(print_expression("8 / 4 / 2"), "(/ (/ 8 4) 2)");
        assert_eq!(print_expression("--1"), "(- (- 1))");
        assert_eq!(print_expression("!!true"), "(! (! true))");
    }

    #[test]
    fn test_unary_nests_right() {
        let mut diagnostics = Diagnostics::silent();
        let tokens = Scanner::new("--1").scan_tokens(&mut diagnostics);
        let expr = Parser::new(tokens).parse_expression(&mut diagnostics);
        let Some(Expr::Unary(outer)) = expr else {
            panic!("expected unary");
        };
        let Expr::Unary(inner) = outer.right.as_ref() else {
            panic!("expected nested unary");
        };
        assert_eq!(
            *inner.right,
            Expr::Literal(Literal(LiteralValue::Number(1.0)))
        );
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        assert_eq!(print_expression("(1 + 2) * 3"), "(* (group (+ 1 2)) 3)");
    }

    #[test]
    fn test_statements_in_source_order() {
        let (statements, diagnostics) = parse("print 1;\n2 + 3;\nprint \"done\";");
        assert!(!diagnostics.had_error());
        let printed: Vec<String> = statements
            .iter()
            .map(|s| Printer.print_statement(s))
            .collect();
        assert_eq!(
            printed,
            vec!["(print 1)", "(expr (+ 2 3))", "(print done)"]
        );
    }

    #[test]
    fn test_error_isolation() {
        let (statements, diagnostics) = parse("print 1 2; print 3;");
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at '2': Expect ';' after value."]
        );
        assert_eq!(statements.len(), 1);
        assert_eq!(Printer.print_statement(&statements[0]), "(print 3)");
    }

    #[test]
    fn test_synchronize_stops_at_statement_keyword() {
        let (statements, diagnostics) = parse("1 + ) 2 3\nprint 4;");
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at ')': Expected expression."]
        );
        assert_eq!(statements.len(), 1);
        assert_eq!(Printer.print_statement(&statements[0]), "(print 4)");
    }

    #[test]
    fn test_errors_at_end() {
        let (statements, diagnostics) = parse("(1 + 2");
        assert!(statements.is_empty());
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at end: Expected ')' after expression."]
        );

        let (_, diagnostics) = parse("1 + 2");
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at end: Expect ';' after expression."]
        );
    }

    #[test]
    fn test_one_error_per_bad_statement() {
        let (statements, diagnostics) = parse("print ;\n* 2;\nprint (1;\nprint 5;");
        assert_eq!(
            messages(&diagnostics),
            vec![
                "[line 1] Error at ';': Expected expression.",
                "[line 2] Error at '*': Expected expression.",
                "[line 3] Error at ';': Expected ')' after expression.",
            ]
        );
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_tokens_without_eof() {
        let mut diagnostics = Diagnostics::silent();
        let statements = Parser::new(vec![]).parse(&mut diagnostics);
        assert!(statements.is_empty());
        assert!(!diagnostics.had_error());
    }
}
