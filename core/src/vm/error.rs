//! VM execution errors.
//!
//! # Error Categories
//!
//! - **Runtime errors**: the program or its bytecode is faulty (bad opcode,
//!   operand types the instruction cannot handle, division by zero).
//!
//! - **Resource exceeded errors**: a well-formed program needs more than the
//!   VM was configured to give it (e.g., stack overflow).
//!
//! Neither kind is fatal to the host. Both abort the current run, after which
//! the VM's stack is not guaranteed to be consistent and the VM should be
//! dropped.

use thiserror::Error;

/// Error returned by [`crate::vm::VM::run`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    ResourceExceeded(#[from] ResourceExceededError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The byte at `ip` is not an opcode this VM executes.
    #[error("unknown opcode 0x{opcode:02X} at offset {ip}")]
    UnknownOpcode { opcode: u8, ip: usize },

    /// The instruction stream ends in the middle of an instruction.
    #[error("truncated {opcode} instruction at offset {ip}")]
    TruncatedInstruction { opcode: &'static str, ip: usize },

    #[error("constant index {index} out of range (pool has {len} constants)")]
    ConstantOutOfRange { index: usize, len: usize },

    #[error("unsupported operand types for {op}: {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {op}")]
    IntegerOverflow { op: &'static str },

    /// An instruction tried to pop more values than the stack holds.
    #[error("stack underflow")]
    StackUnderflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceExceededError {
    #[error("stack overflow: exceeded capacity of {capacity} values")]
    StackOverflow { capacity: usize },
}
