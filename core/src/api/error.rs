//! Public error type for the Quill API.
//!
//! Each layer keeps its own error enum; they are folded into [`Error`] at the
//! API boundary.

use thiserror::Error;

use crate::compiler::CompileError;
use crate::vm::{ExecutionError, ResourceExceededError, RuntimeError};

/// Public error type for all Quill operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The program contains something the compiler cannot lower.
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompileError),

    /// Runtime errors during execution (e.g., division by zero, bad opcode).
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// Resource limits exceeded (e.g., stack overflow).
    #[error("resource limit exceeded: {0}")]
    ResourceExceeded(#[from] ResourceExceededError),

    /// A serialized artifact could not be encoded or decoded.
    #[error("invalid bytecode artifact: {0}")]
    Artifact(postcard::Error),
}

impl From<postcard::Error> for Error {
    fn from(error: postcard::Error) -> Self {
        Error::Artifact(error)
    }
}

impl From<ExecutionError> for Error {
    fn from(error: ExecutionError) -> Self {
        match error {
            ExecutionError::Runtime(error) => Error::Runtime(error),
            ExecutionError::ResourceExceeded(error) => Error::ResourceExceeded(error),
        }
    }
}
