use super::scanner::tokens::{LiteralValue, Token};

pub mod printer;

/// Expression nodes. Every node owns its children outright
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(Binary),
    Unary(Unary),
    Grouping(Grouping),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

impl Binary {
    pub fn new(left: Expr, operator: Token, right: Expr) -> Self {
        Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }
}

/// prefix `!` or `-`
#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: Token,
    pub right: Box<Expr>,
}

impl Unary {
    pub fn new(operator: Token, right: Expr) -> Self {
        Self {
            operator,
            right: Box::new(right),
        }
    }
}

/// Parenthesised expression, kept so the tree records where precedence was overridden
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping(pub Box<Expr>);

#[derive(Debug, Clone, PartialEq)]
pub struct Literal(pub LiteralValue);

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(PureExpression),
    Print(PrintExpression),
}

/// evaluated for its effects, value discarded
#[derive(Debug, Clone, PartialEq)]
pub struct PureExpression(pub Expr);

#[derive(Debug, Clone, PartialEq)]
pub struct PrintExpression(pub Expr);

pub trait ExprVisitor<T> {
    fn visit_expr(&mut self, expr: &Expr) -> T {
        match expr {
            Expr::Binary(binary) => self.visit_binary(binary),
            Expr::Unary(unary) => self.visit_unary(unary),
            Expr::Grouping(grouping) => self.visit_grouping(grouping),
            Expr::Literal(literal) => self.visit_literal(literal),
        }
    }
    fn visit_binary(&mut self, binary: &Binary) -> T;
    fn visit_unary(&mut self, unary: &Unary) -> T;
    fn visit_grouping(&mut self, grouping: &Grouping) -> T;
    fn visit_literal(&mut self, literal: &Literal) -> T;
}

pub trait StmtVisitor<T> {
    fn visit_statement(&mut self, statement: &Stmt) -> T {
        match statement {
            Stmt::Expression(expr) => self.visit_expression_statement(expr),
            Stmt::Print(print) => self.visit_print_statement(print),
        }
    }
    fn visit_expression_statement(&mut self, expression: &PureExpression) -> T;
    fn visit_print_statement(&mut self, print: &PrintExpression) -> T;
}
