//! Quill - a bytecode compiler and stack VM for a small expression language
//!
//! # Overview
//!
//! Quill lowers an already-parsed program tree into compact bytecode and runs
//! it on a stack-based virtual machine. Lexing and parsing are left to the
//! host: programs are handed over as [`ast::Program`] values.
//!
//! Compiled [`Bytecode`] is an immutable artifact. It can be disassembled,
//! serialized to bytes for later runs, and executed any number of times.
//!
//! # Quick Start
//!
//! ```
//! use quill::{Engine, EngineOptions, Value};
//! use quill::ast::{Expression, InfixOp, Program, Statement};
//!
//! let engine = Engine::new(EngineOptions::default());
//!
//! // (1 + 2) * 4
//! let program = Program::new(vec![Statement::Expression(Expression::infix(
//!     Expression::infix(
//!         Expression::IntegerLiteral(1),
//!         InfixOp::Add,
//!         Expression::IntegerLiteral(2),
//!     ),
//!     InfixOp::Mul,
//!     Expression::IntegerLiteral(4),
//! ))]);
//!
//! let bytecode = engine.compile(&program).unwrap();
//! assert_eq!(
//!     bytecode.instructions.to_string(),
//!     "0000 OpConstant 0\n0003 OpConstant 1\n0006 OpAdd\n0007 OpConstant 2\n0010 OpMul\n"
//! );
//! assert_eq!(engine.execute(&bytecode).unwrap(), Some(Value::Integer(12)));
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`Error`]. Use [`render_error`] or
//! [`render_error_to_string`] to present one to a user.

mod error_renderer;

pub use error_renderer::{
    ErrorReport, render_error, render_error_to, render_error_to_string,
    render_error_to_string_no_color,
};

// Re-export public API from quill_core
pub use quill_core::api::{CompilationOptions, Engine, EngineOptions, Error, ExecutionOptions};

// Re-export the layers for hosts that drive them directly
pub use quill_core::{ast, compiler, values, vm};
pub use quill_core::values::Value;
pub use quill_core::vm::{Bytecode, disassemble};
