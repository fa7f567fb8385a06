use super::instruction_set::{Opcode, read_u16};

use crate::{
    api::ExecutionOptions,
    values::Value,
    vm::{Bytecode, ExecutionError, RuntimeError, Stack},
};

/// Default operand stack capacity.
pub const STACK_SIZE: usize = 2048;

/// Stack-based bytecode interpreter.
///
/// A VM borrows one [`Bytecode`] artifact and owns its operand stack. It runs
/// the artifact once; after an error the stack may be inconsistent and the VM
/// should be discarded.
pub struct VM<'b> {
    instructions: &'b [u8],
    constants: &'b [Value],
    ip: usize,
    stack: Stack<Value>,
}

impl<'b> VM<'b> {
    pub fn new(bytecode: &'b Bytecode) -> Self {
        Self::with_stack_size(bytecode, STACK_SIZE)
    }

    pub fn with_options(bytecode: &'b Bytecode, options: &ExecutionOptions) -> Self {
        Self::with_stack_size(bytecode, options.stack_size)
    }

    pub fn with_stack_size(bytecode: &'b Bytecode, stack_size: usize) -> Self {
        VM {
            instructions: &bytecode.instructions,
            constants: &bytecode.constants,
            ip: 0,
            stack: Stack::new(stack_size),
        }
    }

    /// Execute the instruction stream from the start to the end.
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        tracing::debug!(
            bytes = self.instructions.len(),
            constants = self.constants.len(),
            "Running bytecode"
        );
        let result = self.run_main_loop();
        match &result {
            Ok(()) => tracing::debug!(depth = self.stack.len(), "Run finished"),
            Err(error) => tracing::debug!(ip = self.ip, %error, "Run aborted"),
        }
        result
    }

    #[inline(always)]
    fn run_main_loop(&mut self) -> Result<(), ExecutionError> {
        self.ip = 0;
        while self.ip < self.instructions.len() {
            let byte = self.instructions[self.ip];
            // Direct decode; the definition table stays off the hot path.
            let Ok(op) = Opcode::try_from(byte) else {
                return Err(RuntimeError::UnknownOpcode {
                    opcode: byte,
                    ip: self.ip,
                }
                .into());
            };
            tracing::trace!(ip = self.ip, %op, depth = self.stack.len(), "Dispatch");

            match op {
                Opcode::Constant => {
                    let index = read_u16(&self.instructions[self.ip + 1..]).ok_or(
                        RuntimeError::TruncatedInstruction {
                            opcode: op.name(),
                            ip: self.ip,
                        },
                    )? as usize;
                    self.ip += 2;

                    let constant =
                        self.constants
                            .get(index)
                            .ok_or(RuntimeError::ConstantOutOfRange {
                                index,
                                len: self.constants.len(),
                            })?;
                    self.stack.push(*constant)?;
                }
                Opcode::Add => self.execute_integer_op(op, |a, b| {
                    a.checked_add(b)
                        .ok_or(RuntimeError::IntegerOverflow { op: "OpAdd" })
                })?,
                Opcode::Sub => self.execute_integer_op(op, |a, b| {
                    a.checked_sub(b)
                        .ok_or(RuntimeError::IntegerOverflow { op: "OpSub" })
                })?,
                Opcode::Mul => self.execute_integer_op(op, |a, b| {
                    a.checked_mul(b)
                        .ok_or(RuntimeError::IntegerOverflow { op: "OpMul" })
                })?,
                Opcode::Div => self.execute_integer_op(op, |a, b| {
                    if b == 0 {
                        return Err(RuntimeError::DivisionByZero);
                    }
                    a.checked_div(b)
                        .ok_or(RuntimeError::IntegerOverflow { op: "OpDiv" })
                })?,
                Opcode::Pop => {
                    self.stack.pop()?;
                }
            }
            self.ip += 1;
        }
        Ok(())
    }

    /// Pop `right` then `left`, apply `apply(left, right)`, push the result.
    #[inline(always)]
    fn execute_integer_op(
        &mut self,
        op: Opcode,
        apply: impl FnOnce(i64, i64) -> Result<i64, RuntimeError>,
    ) -> Result<(), ExecutionError> {
        let right = self.stack.pop()?;
        let left = self.stack.pop()?;

        let (Value::Integer(a), Value::Integer(b)) = (left, right) else {
            return Err(RuntimeError::TypeMismatch {
                op: op.name(),
                left: left.type_name(),
                right: right.type_name(),
            }
            .into());
        };
        self.stack.push(Value::Integer(apply(a, b)?))?;
        Ok(())
    }

    /// The value on top of the operand stack, if any.
    pub fn stack_top(&self) -> Option<&Value> {
        self.stack.peek()
    }

    /// The value most recently removed from the stack.
    ///
    /// Only meaningful directly after a pop. Before the first pop, or once a
    /// later push has reused the slot, this returns whatever the slot above
    /// the top holds, which is not the last popped value.
    pub fn last_popped_stack_elem(&self) -> Option<&Value> {
        self.stack.last_popped()
    }

    /// Number of values currently on the operand stack.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }
}
