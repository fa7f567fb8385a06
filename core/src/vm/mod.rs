//! Bytecode format and the virtual machine that executes it.
//!
//! The compiler produces a [`Bytecode`] artifact; [`VM`] runs it against a
//! fixed-capacity operand [`Stack`].

mod code;
mod error;
mod instruction_set;
mod runtime;
mod stack;

pub use code::{Bytecode, Instructions, ResultMode, disassemble};
pub use error::{ExecutionError, ResourceExceededError, RuntimeError};
pub use instruction_set::{
    Definition, EncodedInstruction, EncodingError, Opcode, OperandWidth, Operands,
    encode_operands, lookup, make, read_operands, read_u16,
};
pub use runtime::{STACK_SIZE, VM};
pub use stack::Stack;
