//! Bytecode compiler for Quill programs.
//!
//! Lowers an [`ast::Program`](crate::ast::Program) into a
//! [`Bytecode`](crate::vm::Bytecode) artifact by walking the tree depth-first
//! and appending instructions and constants as it goes.
//!
//! ## Design
//!
//! - Operands are compiled left to right, then the operator is emitted
//! - Constants are appended to the pool in the order they are met
//! - Tracks operand stack depth so the artifact's peak stack use is known
//! - Stops at the first construct it cannot lower

mod bytecode;
mod error;


pub use bytecode::{Compiler, Node};
pub use error::CompileError;
