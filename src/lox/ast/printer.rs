use std::io::{self, Write};

use super::{
    Binary, Expr, ExprVisitor, Grouping, Literal, PrintExpression, PureExpression, Stmt,
    StmtVisitor, Unary,
};
use crate::lox::{interpreter::RuntimeError, Backend};

/// Renders trees in parenthesised prefix form, e.g. `(* (- 123) (group 45.67))`
pub struct Printer;

impl Printer {
    pub fn print(&mut self, expr: &Expr) -> String {
        self.visit_expr(expr)
    }

    pub fn print_statement(&mut self, statement: &Stmt) -> String {
        self.visit_statement(statement)
    }

    fn parenthesize(&mut self, name: &str, expressions: Vec<&Expr>) -> String {
        let mut s = format!("({}", name);
        for expr in expressions {
            s.push_str(&format!(" {}", &self.visit_expr(expr)));
        }
        s + ")"
    }
}

impl ExprVisitor<String> for Printer {
    fn visit_binary(&mut self, binary: &Binary) -> String {
        self.parenthesize(
            &binary.operator.lexeme,
            vec![binary.left.as_ref(), binary.right.as_ref()],
        )
    }

    fn visit_unary(&mut self, unary: &Unary) -> String {
        self.parenthesize(&unary.operator.lexeme, vec![unary.right.as_ref()])
    }

    fn visit_grouping(&mut self, grouping: &Grouping) -> String {
        self.parenthesize("group", vec![grouping.0.as_ref()])
    }

    fn visit_literal(&mut self, literal: &Literal) -> String {
        literal.0.to_string()
    }
}

impl StmtVisitor<String> for Printer {
    fn visit_expression_statement(&mut self, expression: &PureExpression) -> String {
        self.parenthesize("expr", vec![&expression.0])
    }

    fn visit_print_statement(&mut self, print: &PrintExpression) -> String {
        self.parenthesize("print", vec![&print.0])
    }
}

/// Backend that prints each parsed statement, one per line, instead of running it
pub struct AstEmitter<W: Write> {
    out: W,
}

impl AstEmitter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> AstEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Backend for AstEmitter<W> {
    fn execute(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            writeln!(self.out, "{}", Printer.print_statement(statement))?;
        }
        Ok(())
    }
}
