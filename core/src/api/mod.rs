//! Public API for compiling and executing Quill programs.
//!
//! The [`Engine`] ties the compiler and the VM together behind one error type.
//!
//! # Example
//!
//! ```
//! use quill_core::api::{Engine, EngineOptions};
//! use quill_core::ast::{Expression, InfixOp, Program, Statement};
//! use quill_core::values::Value;
//!
//! let engine = Engine::new(EngineOptions::default());
//! let program = Program::new(vec![Statement::Expression(Expression::infix(
//!     Expression::IntegerLiteral(1),
//!     InfixOp::Add,
//!     Expression::IntegerLiteral(2),
//! ))]);
//!
//! let bytecode = engine.compile(&program).unwrap();
//! assert_eq!(engine.execute(&bytecode).unwrap(), Some(Value::Integer(3)));
//! ```

pub mod engine;
pub mod error;
pub mod options;

pub use engine::Engine;
pub use error::Error;
pub use options::{CompilationOptions, EngineOptions, ExecutionOptions};
