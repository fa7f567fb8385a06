//! Bytecode compiler implementation.

use crate::{
    Vec,
    api::CompilationOptions,
    ast::{Expression, InfixOp, Program, Statement},
    compiler::CompileError,
    values::Value,
    vm::{Bytecode, Instructions, Opcode, OperandWidth, ResultMode, make},
};

/// Largest constant pool an `OpConstant` operand can address.
const MAX_CONSTANTS: usize = OperandWidth::U16.max_value() + 1;

/// Any tree node the compiler accepts as input.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Expression(&'a Expression),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(statement: &'a Statement) -> Self {
        Node::Statement(statement)
    }
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(expression: &'a Expression) -> Self {
        Node::Expression(expression)
    }
}

/// Lowers AST nodes into an instruction stream plus constant pool.
///
/// Both grow append-only as nodes are compiled. A compiler is meant for a
/// single compilation attempt: after an error its buffers hold a partial
/// program and it should be dropped.
#[derive(Debug, Default)]
pub struct Compiler {
    instructions: Instructions,

    /// Constant pool, indexed by `OpConstant` operands.
    ///
    /// Literals are not deduplicated; each occurrence gets its own slot.
    constants: Vec<Value>,

    options: CompilationOptions,

    /// Current operand stack depth at the point being compiled.
    current_stack_depth: usize,

    /// Maximum stack depth observed.
    max_stack_depth: usize,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompilationOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Convenience method to compile a whole program in one call.
    pub fn compile_program(
        program: &Program,
        options: CompilationOptions,
    ) -> Result<Bytecode, CompileError> {
        let mut compiler = Self::with_options(options);
        compiler.compile(program)?;
        Ok(compiler.into_bytecode())
    }

    /// Snapshot of what has been compiled so far.
    pub fn bytecode(&self) -> Bytecode {
        Bytecode::new(self.instructions.clone(), self.constants.clone())
            .with_result_mode(self.result_mode())
    }

    /// Finish compilation and hand the artifact off.
    pub fn into_bytecode(self) -> Bytecode {
        tracing::debug!(
            bytes = self.instructions.len(),
            constants = self.constants.len(),
            max_stack_depth = self.max_stack_depth,
            "Compiled bytecode"
        );
        let result_mode = self.result_mode();
        Bytecode::new(self.instructions, self.constants).with_result_mode(result_mode)
    }

    fn result_mode(&self) -> ResultMode {
        if self.options.pop_expression_results {
            ResultMode::LastPopped
        } else {
            ResultMode::StackTop
        }
    }

    /// Peak operand stack depth of the code emitted so far.
    pub fn max_stack_depth(&self) -> usize {
        self.max_stack_depth
    }

    pub fn compile<'a>(&mut self, node: impl Into<Node<'a>>) -> Result<(), CompileError> {
        match node.into() {
            Node::Program(program) => {
                for statement in &program.statements {
                    self.compile_statement(statement)?;
                }
                Ok(())
            }
            Node::Statement(statement) => self.compile_statement(statement),
            Node::Expression(expression) => self.compile_expression(expression),
        }
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Expression(expression) => {
                self.compile_expression(expression)?;
                if self.options.pop_expression_results {
                    self.emit(Opcode::Pop, &[])?;
                }
                Ok(())
            }
            Statement::Let { .. } | Statement::Return(_) => Err(CompileError::Unsupported {
                construct: statement.kind(),
            }),
        }
    }

    fn compile_expression(&mut self, expression: &Expression) -> Result<(), CompileError> {
        match expression {
            Expression::IntegerLiteral(value) => self.emit_constant(Value::Integer(*value)),
            Expression::Boolean(value) => self.emit_constant(Value::Boolean(*value)),
            Expression::Infix { left, op, right } => {
                let opcode = match op {
                    InfixOp::Add => Opcode::Add,
                    InfixOp::Sub => Opcode::Sub,
                    InfixOp::Mul => Opcode::Mul,
                    InfixOp::Div => Opcode::Div,
                    InfixOp::Lt | InfixOp::Gt | InfixOp::Eq | InfixOp::Neq => {
                        return Err(CompileError::Unsupported {
                            construct: "comparison expression",
                        });
                    }
                };
                self.compile_expression(left)?;
                self.compile_expression(right)?;
                self.emit(opcode, &[])?;
                Ok(())
            }
            Expression::Identifier(_) | Expression::Prefix { .. } => {
                Err(CompileError::Unsupported {
                    construct: expression.kind(),
                })
            }
        }
    }

    fn emit_constant(&mut self, value: Value) -> Result<(), CompileError> {
        let index = self.add_constant(value)?;
        self.emit(Opcode::Constant, &[index])?;
        Ok(())
    }

    // === Instruction Emission ===

    /// Encode one instruction, append it, and return the offset it starts at.
    pub fn emit(&mut self, op: Opcode, operands: &[usize]) -> Result<usize, CompileError> {
        let instruction = make(op, operands)?;
        self.track_stack_effect(op);
        Ok(self.instructions.push(&instruction))
    }

    /// Append `value` to the constant pool and return its index.
    pub fn add_constant(&mut self, value: Value) -> Result<usize, CompileError> {
        if self.constants.len() >= MAX_CONSTANTS {
            return Err(CompileError::TooManyConstants {
                limit: MAX_CONSTANTS,
            });
        }
        let index = self.constants.len();
        tracing::debug!(index, %value, "Adding constant");
        self.constants.push(value);
        Ok(index)
    }

    // === Stack Management ===

    fn track_stack_effect(&mut self, op: Opcode) {
        match op {
            Opcode::Constant => {
                self.current_stack_depth += 1;
                self.max_stack_depth = self.max_stack_depth.max(self.current_stack_depth);
            }
            // Two operands in, one result out.
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Pop => {
                // Hand-emitted sequences may be unbalanced; the VM reports that.
                self.current_stack_depth = self.current_stack_depth.saturating_sub(1);
            }
        }
    }
}
