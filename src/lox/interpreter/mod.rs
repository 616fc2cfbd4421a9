use std::io::{self, Write};

use thiserror::Error;

use super::{
    ast::{
        Binary, Expr, ExprVisitor, Grouping, Literal, PrintExpression, PureExpression, Stmt,
        StmtVisitor, Unary,
    },
    scanner::tokens::{write_number, LiteralValue, Token, TokenType},
    Backend,
};

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Operand must be a number.\n[line {}]", .operator.line)]
    InvalidOperand { operator: Token },
    #[error("Operands must be numbers.\n[line {}]", .operator.line)]
    InvalidOperands { operator: Token },
    #[error("Operands must be two numbers or two strings.\n[line {}]", .operator.line)]
    InvalidAddition { operator: Token },
    #[error("Invalid operator: {}\n[line {}]", .operator.lexeme, .operator.line)]
    InvalidOperator { operator: Token },
    #[error("Could not write output: {0}")]
    Output(#[from] io::Error),
}

/// Values computed at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeValue {
    Boolean(bool),
    String(String),
    Number(f64),
    Nil,
}

impl From<LiteralValue> for RuntimeValue {
    fn from(val: LiteralValue) -> Self {
        match val {
            LiteralValue::Boolean(v) => RuntimeValue::Boolean(v),
            LiteralValue::String(v) => RuntimeValue::String(v),
            LiteralValue::Number(v) => RuntimeValue::Number(v),
            LiteralValue::Nil => RuntimeValue::Nil,
        }
    }
}

impl std::fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeValue::Boolean(val) => write!(f, "{val}"),
            RuntimeValue::String(val) => write!(f, "{val}"),
            RuntimeValue::Number(val) => write_number(f, *val),
            RuntimeValue::Nil => write!(f, "nil"),
        }
    }
}

fn is_truthy(val: &RuntimeValue) -> bool {
    match val {
        RuntimeValue::Nil => false,
        RuntimeValue::Boolean(val) => *val,
        _ => true,
    }
}

/// Evaluates statements in order, writing `print` output to `out`
pub struct Interpreter<W: Write> {
    out: W,
}

impl Interpreter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.visit_statement(statement)?;
        }
        Ok(())
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<RuntimeValue, RuntimeError> {
        self.visit_expr(expr)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Backend for Interpreter<W> {
    fn execute(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        self.interpret(statements)
    }
}

/// Visitor pattern that evaluates expressions
impl<W: Write> ExprVisitor<Result<RuntimeValue, RuntimeError>> for Interpreter<W> {
    fn visit_literal(&mut self, literal: &Literal) -> Result<RuntimeValue, RuntimeError> {
        Ok(literal.0.clone().into())
    }

    fn visit_grouping(&mut self, grouping: &Grouping) -> Result<RuntimeValue, RuntimeError> {
        self.evaluate(&grouping.0)
    }

    fn visit_unary(&mut self, unary: &Unary) -> Result<RuntimeValue, RuntimeError> {
        let inner_value = self.evaluate(&unary.right)?;
        match (&unary.operator.token_type, inner_value) {
            (TokenType::Minus, RuntimeValue::Number(num)) => Ok(RuntimeValue::Number(-num)),
            // "-" operator with non-Number inner_value is invalid
            (TokenType::Minus, _) => Err(RuntimeError::InvalidOperand {
                operator: unary.operator.clone(),
            }),
            (TokenType::Bang, val) => Ok(RuntimeValue::Boolean(!is_truthy(&val))),
            (_, _) => Err(RuntimeError::InvalidOperator {
                operator: unary.operator.clone(),
            }),
        }
    }

    fn visit_binary(&mut self, binary: &Binary) -> Result<RuntimeValue, RuntimeError> {
        let left_val = self.evaluate(&binary.left)?;
        let right_val = self.evaluate(&binary.right)?;

        let operator = &binary.operator;
        match operator.token_type {
            TokenType::EqualEqual => return Ok(RuntimeValue::Boolean(left_val == right_val)),
            TokenType::BangEqual => return Ok(RuntimeValue::Boolean(left_val != right_val)),
            // "+" is used for both number addition and string concatenation
            TokenType::Plus => {
                return match (left_val, right_val) {
                    (RuntimeValue::Number(l), RuntimeValue::Number(r)) => {
                        Ok(RuntimeValue::Number(l + r))
                    }
                    (RuntimeValue::String(l), RuntimeValue::String(r)) => {
                        Ok(RuntimeValue::String(l + &r))
                    }
                    (_, _) => Err(RuntimeError::InvalidAddition {
                        operator: operator.clone(),
                    }),
                }
            }
            _ => {}
        }

        let (l, r) = match (&left_val, &right_val) {
            (RuntimeValue::Number(l), RuntimeValue::Number(r)) => (*l, *r),
            _ => {
                return Err(RuntimeError::InvalidOperands {
                    operator: operator.clone(),
                })
            }
        };
        match operator.token_type {
            TokenType::Greater => Ok(RuntimeValue::Boolean(l > r)),
            TokenType::GreaterEqual => Ok(RuntimeValue::Boolean(l >= r)),
            TokenType::Less => Ok(RuntimeValue::Boolean(l < r)),
            TokenType::LessEqual => Ok(RuntimeValue::Boolean(l <= r)),
            TokenType::Minus => Ok(RuntimeValue::Number(l - r)),
            TokenType::Slash => Ok(RuntimeValue::Number(l / r)),
            TokenType::Star => Ok(RuntimeValue::Number(l * r)),
            _ => Err(RuntimeError::InvalidOperator {
                operator: operator.clone(),
            }),
        }
    }
}

impl<W: Write> StmtVisitor<Result<(), RuntimeError>> for Interpreter<W> {
    fn visit_expression_statement(
        &mut self,
        expression: &PureExpression,
    ) -> Result<(), RuntimeError> {
        let _value = self.evaluate(&expression.0)?;
        Ok(())
    }

    fn visit_print_statement(&mut self, print: &PrintExpression) -> Result<(), RuntimeError> {
        let value = self.evaluate(&print.0)?;
        writeln!(self.out, "{value}")?;
        Ok(())
    }
}
