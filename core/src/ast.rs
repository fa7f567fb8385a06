//! Syntax tree consumed by the compiler.
//!
//! Quill does not parse source text. A front end builds these nodes and hands
//! the root [`Program`] to [`crate::compiler::Compiler`]. The node set is closed:
//! the compiler matches on every kind and rejects the ones it cannot lower yet.
//!
//! ```
//! use quill_core::ast::{Expression, InfixOp, Program, Statement};
//!
//! // 1 + 2
//! let program = Program::new(vec![Statement::Expression(Expression::infix(
//!     Expression::IntegerLiteral(1),
//!     InfixOp::Add,
//!     Expression::IntegerLiteral(2),
//! ))]);
//! assert_eq!(program.to_string(), "(1 + 2)");
//! ```

use core::fmt;

use crate::{Box, String, Vec};

/// Root of a syntax tree: top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `let <name> = <value>;`
    Let { name: Identifier, value: Expression },
    /// `return <value>;`
    Return(Expression),
    /// An expression evaluated for its value.
    Expression(Expression),
}

impl Statement {
    /// Short name of the node kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Let { .. } => "let statement",
            Statement::Return(_) => "return statement",
            Statement::Expression(_) => "expression statement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(i64),
    Boolean(bool),
    Prefix {
        op: PrefixOp,
        right: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        op: InfixOp,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn infix(left: Expression, op: InfixOp, right: Expression) -> Self {
        Expression::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn prefix(op: PrefixOp, right: Expression) -> Self {
        Expression::Prefix {
            op,
            right: Box::new(right),
        }
    }

    /// Short name of the node kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Identifier(_) => "identifier",
            Expression::IntegerLiteral(_) => "integer literal",
            Expression::Boolean(_) => "boolean literal",
            Expression::Prefix { .. } => "prefix expression",
            Expression::Infix { .. } => "infix expression",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Eq,
    Neq,
}

impl InfixOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
            InfixOp::Eq => "==",
            InfixOp::Neq => "!=",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return(value) => write!(f, "return {};", value),
            Statement::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::IntegerLiteral(value) => write!(f, "{}", value),
            Expression::Boolean(value) => write!(f, "{}", value),
            Expression::Prefix { op, right } => {
                let symbol = match op {
                    PrefixOp::Neg => "-",
                    PrefixOp::Not => "!",
                };
                write!(f, "({}{})", symbol, right)
            }
            Expression::Infix { left, op, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
        }
    }
}
