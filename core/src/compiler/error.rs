//! Bytecode compilation errors.

use thiserror::Error;

use crate::vm::EncodingError;

/// Errors that can occur during bytecode compilation.
///
/// Compilation stops at the first one; no partial bytecode is handed out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The tree contains a node kind the compiler has no lowering for.
    #[error("cannot compile {construct}: not supported by the bytecode compiler")]
    Unsupported { construct: &'static str },

    /// Constant pool indices must fit the 2-byte `OpConstant` operand.
    #[error("too many constants (limit: {limit})")]
    TooManyConstants { limit: usize },

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}
