//! Quill VM Instructions - Variable-Width Byte Format
//!
//! This module defines the instruction set for Quill's stack-based virtual machine.
//!
//! # Instruction Format
//!
//! An instruction is one opcode byte followed by zero or more operands:
//! ```text
//! ┌──────────┬───────────────┬───────────────┬─────
//! │  Opcode  │   Operand 0   │   Operand 1   │ ...
//! │ (8 bits) │ (1, 2, 4 B)   │ (1, 2, 4 B)   │
//! └──────────┴───────────────┴───────────────┴─────
//! ```
//!
//! - Operand widths are declared per opcode in its [`Definition`].
//! - Operands are unsigned and big-endian.
//! - Instructions are packed back to back with no padding, so boundaries can
//!   only be recovered by decoding sequentially from a known boundary.
//!
//! Adding an opcode means adding a variant and a row in the definition table;
//! the encoder and decoder are driven by the declared widths.
//!
//! # Stack Discipline
//!
//! Stack effect notation: `[..., operand1, operand2] -> [..., result]`

use core::fmt;

use smallvec::SmallVec;
use thiserror::Error;

/// A single-byte operation identifier.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Push constant from pool
    /// Operand: u16 index | Stack: [...] -> [..., constants[index]]
    Constant = 0x00,

    /// Integer addition
    /// Stack: [..., a: Integer, b: Integer] -> [..., a + b]
    Add = 0x01,

    /// Pop top value
    /// Stack: [..., a] -> [...]
    Pop = 0x02,

    /// Integer subtraction
    /// Stack: [..., a: Integer, b: Integer] -> [..., a - b]
    Sub = 0x03,

    /// Integer multiplication
    /// Stack: [..., a: Integer, b: Integer] -> [..., a * b]
    Mul = 0x04,

    /// Integer division, truncating toward zero (can error)
    /// Stack: [..., a: Integer, b: Integer] -> [..., a / b]
    Div = 0x05,
    // 0x06-0xFF reserved
}
static_assertions::assert_eq_size!(Opcode, u8);

impl Opcode {
    /// Every opcode, in discriminant order.
    pub const ALL: [Opcode; 6] = [
        Opcode::Constant,
        Opcode::Add,
        Opcode::Pop,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
    ];

    #[inline]
    pub fn definition(self) -> &'static Definition {
        &DEFINITIONS[self as usize]
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.definition().name
    }
}

impl TryFrom<u8> for Opcode {
    type Error = EncodingError;

    #[inline]
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x00 => Ok(Opcode::Constant),
            0x01 => Ok(Opcode::Add),
            0x02 => Ok(Opcode::Pop),
            0x03 => Ok(Opcode::Sub),
            0x04 => Ok(Opcode::Mul),
            0x05 => Ok(Opcode::Div),
            _ => Err(EncodingError::UndefinedOpcode(byte)),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Width of a single operand in bytes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandWidth {
    U8 = 1,
    U16 = 2,
    U32 = 4,
}

impl OperandWidth {
    #[inline]
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Largest operand encodable at this width.
    pub const fn max_value(self) -> usize {
        match self {
            OperandWidth::U8 => u8::MAX as usize,
            OperandWidth::U16 => u16::MAX as usize,
            OperandWidth::U32 => u32::MAX as usize,
        }
    }
}

/// Name and operand layout of an opcode.
#[derive(Debug, PartialEq, Eq)]
pub struct Definition {
    pub name: &'static str,
    pub operand_widths: &'static [OperandWidth],
}

impl Definition {
    /// Total size of the operands in bytes (opcode byte excluded).
    pub fn operands_len(&self) -> usize {
        self.operand_widths.iter().map(|w| w.bytes()).sum()
    }

    /// Total size of an encoded instruction in bytes.
    pub fn instruction_len(&self) -> usize {
        1 + self.operands_len()
    }
}

/// Opcode definitions, indexed by opcode byte.
static DEFINITIONS: [Definition; Opcode::ALL.len()] = [
    Definition {
        name: "OpConstant",
        operand_widths: &[OperandWidth::U16],
    },
    Definition {
        name: "OpAdd",
        operand_widths: &[],
    },
    Definition {
        name: "OpPop",
        operand_widths: &[],
    },
    Definition {
        name: "OpSub",
        operand_widths: &[],
    },
    Definition {
        name: "OpMul",
        operand_widths: &[],
    },
    Definition {
        name: "OpDiv",
        operand_widths: &[],
    },
];

// Discriminants must be dense and ordered for `DEFINITIONS` to be indexable.
const _: () = {
    let mut i = 0;
    while i < Opcode::ALL.len() {
        assert!(Opcode::ALL[i] as usize == i);
        i += 1;
    }
};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("opcode {0} undefined")]
    UndefinedOpcode(u8),

    #[error("{opcode} expects {expected} operand(s), got {got}")]
    OperandCountMismatch {
        opcode: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("operand {operand} does not fit in {width} byte(s)")]
    OperandOutOfRange { operand: usize, width: usize },

    #[error("truncated instruction: expected {expected} operand byte(s), found {found}")]
    Truncated { expected: usize, found: usize },
}

// ============================================================================
// Encoding & Decoding
// ============================================================================

/// An encoded instruction. Fits inline for every opcode we define.
pub type EncodedInstruction = SmallVec<[u8; 8]>;

/// Decoded operand values of one instruction.
pub type Operands = SmallVec<[usize; 2]>;

/// Look up the definition of an opcode byte.
///
/// Meant for disassembly and tests. The VM dispatches on [`Opcode`] directly.
pub fn lookup(byte: u8) -> Result<&'static Definition, EncodingError> {
    Opcode::try_from(byte).map(Opcode::definition)
}

/// Encode an instruction: opcode byte followed by big-endian operands.
///
/// # Example
///
/// ```
/// use quill_core::vm::{Opcode, make};
///
/// let instruction = make(Opcode::Constant, &[65534]).unwrap();
/// assert_eq!(instruction.as_slice(), &[0x00, 255, 254]);
/// ```
pub fn make(op: Opcode, operands: &[usize]) -> Result<EncodedInstruction, EncodingError> {
    let definition = op.definition();
    let mut instruction = EncodedInstruction::with_capacity(definition.instruction_len());
    instruction.push(op as u8);
    encode_operands(definition, operands, &mut instruction)?;
    Ok(instruction)
}

/// Append `operands` to `out`, each at the width `definition` declares for its position.
pub fn encode_operands(
    definition: &Definition,
    operands: &[usize],
    out: &mut EncodedInstruction,
) -> Result<(), EncodingError> {
    if operands.len() != definition.operand_widths.len() {
        return Err(EncodingError::OperandCountMismatch {
            opcode: definition.name,
            expected: definition.operand_widths.len(),
            got: operands.len(),
        });
    }

    for (&operand, &width) in operands.iter().zip(definition.operand_widths) {
        if operand > width.max_value() {
            return Err(EncodingError::OperandOutOfRange {
                operand,
                width: width.bytes(),
            });
        }
        match width {
            OperandWidth::U8 => out.push(operand as u8),
            OperandWidth::U16 => out.extend_from_slice(&(operand as u16).to_be_bytes()),
            OperandWidth::U32 => out.extend_from_slice(&(operand as u32).to_be_bytes()),
        }
    }
    Ok(())
}

/// Decode the operands that follow an opcode byte.
///
/// `bytes` starts right after the opcode. Returns the operands and the number
/// of bytes they occupied, so the caller can step past them.
pub fn read_operands(
    definition: &Definition,
    bytes: &[u8],
) -> Result<(Operands, usize), EncodingError> {
    let expected = definition.operands_len();
    if bytes.len() < expected {
        return Err(EncodingError::Truncated {
            expected,
            found: bytes.len(),
        });
    }

    let mut operands = Operands::new();
    let mut offset = 0;
    for &width in definition.operand_widths {
        let operand = &bytes[offset..offset + width.bytes()];
        operands.push(match width {
            OperandWidth::U8 => operand[0] as usize,
            OperandWidth::U16 => u16::from_be_bytes([operand[0], operand[1]]) as usize,
            OperandWidth::U32 => {
                u32::from_be_bytes([operand[0], operand[1], operand[2], operand[3]]) as usize
            }
        });
        offset += width.bytes();
    }
    Ok((operands, offset))
}

/// Read a big-endian `u16` from the start of `bytes`.
///
/// Hot-path helper for the VM, which knows the operand layout of the opcode it
/// is executing and skips the definition table.
#[inline(always)]
pub fn read_u16(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}
