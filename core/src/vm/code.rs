use core::fmt::{self, Write};
use core::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{
    String, Vec,
    values::Value,
    vm::{EncodingError, lookup, read_operands},
};

/// A flat, append-only stream of encoded instructions.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instructions(Vec<u8>);

impl Instructions {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an encoded instruction and return the offset it starts at.
    pub fn push(&mut self, instruction: &[u8]) -> usize {
        let position = self.0.len();
        self.0.extend_from_slice(instruction);
        position
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Instructions {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Instructions {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl FromIterator<u8> for Instructions {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> Extend<&'a u8> for Instructions {
    fn extend<I: IntoIterator<Item = &'a u8>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

/// Disassembly listing, one instruction per line.
impl fmt::Display for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_disassembly(f, &self.0)
    }
}

impl fmt::Debug for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instructions {{")?;
        for line in disassemble(&self.0).lines() {
            writeln!(f, "    {}", line)?;
        }
        write!(f, "}}")
    }
}

/// Render a human-readable listing of an instruction stream.
///
/// Each line is `{offset:04} {name} {operands...}`. An undefined opcode is
/// reported on its own line and the listing resumes at the following byte.
/// A truncated final instruction ends the listing.
///
/// ```
/// use quill_core::vm::{Opcode, disassemble, make};
///
/// let mut bytes = make(Opcode::Constant, &[2]).unwrap().to_vec();
/// bytes.extend_from_slice(&make(Opcode::Constant, &[65535]).unwrap());
/// assert_eq!(disassemble(&bytes), "0000 OpConstant 2\n0003 OpConstant 65535\n");
/// ```
pub fn disassemble(bytes: &[u8]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_disassembly(&mut out, bytes);
    out
}

fn write_disassembly(out: &mut impl Write, bytes: &[u8]) -> fmt::Result {
    let mut offset = 0;
    while offset < bytes.len() {
        let definition = match lookup(bytes[offset]) {
            Ok(definition) => definition,
            Err(err) => {
                writeln!(out, "{:04} ERROR: {}", offset, err)?;
                offset += 1;
                continue;
            }
        };

        match read_operands(definition, &bytes[offset + 1..]) {
            Ok((operands, read)) => {
                write!(out, "{:04} {}", offset, definition.name)?;
                for operand in &operands {
                    write!(out, " {}", operand)?;
                }
                writeln!(out)?;
                offset += 1 + read;
            }
            Err(err @ EncodingError::Truncated { .. }) => {
                writeln!(out, "{:04} ERROR: {}: {}", offset, definition.name, err)?;
                break;
            }
            Err(err) => {
                writeln!(out, "{:04} ERROR: {}", offset, err)?;
                offset += 1;
            }
        }
    }
    Ok(())
}

/// Where the value of the last expression statement ends up after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultMode {
    /// Expression results stay on the stack; the result is the stack top.
    #[default]
    StackTop,
    /// Every expression statement is followed by `OpPop`; the result is the
    /// last popped value.
    LastPopped,
}

/// Compiler output and VM input: an instruction stream plus the constant pool
/// its `OpConstant` operands index into.
///
/// Immutable once produced. It serializes with `postcard` so compiled programs
/// can be stored and executed later, and carries the [`ResultMode`] it was
/// compiled with so any engine reads its result from the right place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bytecode {
    pub instructions: Instructions,
    pub constants: Vec<Value>,
    pub result_mode: ResultMode,
}

impl Bytecode {
    pub fn new(instructions: Instructions, constants: Vec<Value>) -> Self {
        Self {
            instructions,
            constants,
            result_mode: ResultMode::StackTop,
        }
    }

    pub fn with_result_mode(mut self, result_mode: ResultMode) -> Self {
        self.result_mode = result_mode;
        self
    }

    /// Encode this artifact with postcard.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    /// Decode an artifact previously written by [`Bytecode::to_bytes`].
    ///
    /// Only the container is validated here; malformed instructions surface
    /// as runtime errors when the VM reaches them.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

// Artifacts are shared read-only between VMs.
static_assertions::assert_impl_all!(Bytecode: Send, Sync);

/// Constant pool followed by the disassembly listing.
impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "constants:")?;
        for (i, constant) in self.constants.iter().enumerate() {
            writeln!(f, "  [{}] = {}", i, constant)?;
        }
        writeln!(f, "instructions:")?;
        write!(f, "{}", self.instructions)
    }
}
