//! Engine API for compiling and executing Quill programs.

use crate::{
    api::{CompilationOptions, EngineOptions, Error, ExecutionOptions},
    ast::Program,
    compiler::Compiler,
    values::Value,
    vm::{Bytecode, ResultMode, VM},
};

/// The Quill compilation and execution engine.
///
/// Holds the default options used by [`Engine::compile`] and
/// [`Engine::execute`]. The engine itself is stateless between calls: every
/// compilation gets a fresh [`Compiler`] and every run a fresh [`VM`].
///
/// # Example
///
/// ```
/// use quill_core::api::{CompilationOptions, Engine, EngineOptions};
/// use quill_core::ast::{Expression, InfixOp, Program, Statement};
/// use quill_core::values::Value;
///
/// let engine = Engine::new(EngineOptions {
///     default_compilation_options: CompilationOptions {
///         pop_expression_results: true,
///     },
///     ..Default::default()
/// });
///
/// let program = Program::new(vec![Statement::Expression(Expression::infix(
///     Expression::IntegerLiteral(6),
///     InfixOp::Mul,
///     Expression::IntegerLiteral(7),
/// ))]);
/// assert_eq!(engine.eval(&program).unwrap(), Some(Value::Integer(42)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: EngineOptions,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    /// Access the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Compile a program with the engine's default compilation options.
    pub fn compile(&self, program: &Program) -> Result<Bytecode, Error> {
        self.compile_with_options(program, self.options.default_compilation_options.clone())
    }

    pub fn compile_with_options(
        &self,
        program: &Program,
        options: CompilationOptions,
    ) -> Result<Bytecode, Error> {
        tracing::debug!(
            statements = program.statements.len(),
            pop_expression_results = options.pop_expression_results,
            "Compiling program"
        );
        Ok(Compiler::compile_program(program, options)?)
    }

    /// Run a compiled artifact with the engine's default execution options.
    ///
    /// Returns the program's result as selected by the artifact's
    /// [`ResultMode`]: the last popped value or the value left on top of the
    /// stack. `None` if there is no such value.
    pub fn execute(&self, bytecode: &Bytecode) -> Result<Option<Value>, Error> {
        self.execute_with_options(bytecode, &self.options.default_execution_options)
    }

    pub fn execute_with_options(
        &self,
        bytecode: &Bytecode,
        options: &ExecutionOptions,
    ) -> Result<Option<Value>, Error> {
        let mut vm = VM::with_options(bytecode, options);
        vm.run()?;

        let result = match bytecode.result_mode {
            ResultMode::LastPopped => vm.last_popped_stack_elem(),
            ResultMode::StackTop => vm.stack_top(),
        };
        Ok(result.copied())
    }

    /// Compile then execute, both with the engine's default options.
    pub fn eval(&self, program: &Program) -> Result<Option<Value>, Error> {
        let bytecode = self.compile(program)?;
        self.execute(&bytecode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{Expression, InfixOp, Statement},
        compiler::CompileError,
        vec,
        vm::{ResourceExceededError, RuntimeError},
    };

    fn int(value: i64) -> Expression {
        Expression::IntegerLiteral(value)
    }

    fn single(expression: Expression) -> Program {
        Program::new(vec![Statement::Expression(expression)])
    }

    #[test]
    fn test_eval_leaves_result_on_stack() {
        let engine = Engine::default();
        let result = engine.eval(&single(Expression::infix(int(1), InfixOp::Add, int(2))));
        assert_eq!(result.unwrap(), Some(Value::Integer(3)));
    }

    #[test]
    fn test_eval_with_popped_results() {
        let engine = Engine::new(EngineOptions {
            default_compilation_options: CompilationOptions {
                pop_expression_results: true,
            },
            ..Default::default()
        });
        let program = Program::new(vec![
            Statement::Expression(int(1)),
            Statement::Expression(Expression::infix(int(10), InfixOp::Div, int(3))),
        ]);
        assert_eq!(engine.eval(&program).unwrap(), Some(Value::Integer(3)));
    }

    #[test]
    fn test_eval_empty_program() {
        let engine = Engine::default();
        assert_eq!(engine.eval(&Program::default()).unwrap(), None);
    }

    #[test]
    fn test_compilation_error() {
        let engine = Engine::default();
        let err = engine.compile(&Program::new(vec![Statement::Return(int(1))]));
        assert!(matches!(
            err,
            Err(Error::Compilation(CompileError::Unsupported {
                construct: "return statement"
            }))
        ));
    }

    #[test]
    fn test_runtime_error() {
        let engine = Engine::default();
        let err = engine
            .eval(&single(Expression::infix(
                Expression::Boolean(true),
                InfixOp::Add,
                int(1),
            )))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Runtime(RuntimeError::TypeMismatch { op: "OpAdd", .. })
        ));
    }

    #[test]
    fn test_resource_exceeded() {
        let engine = Engine::new(EngineOptions {
            default_execution_options: ExecutionOptions { stack_size: 1 },
            ..Default::default()
        });
        let err = engine
            .eval(&single(Expression::infix(int(1), InfixOp::Add, int(2))))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ResourceExceeded(ResourceExceededError::StackOverflow { capacity: 1 })
        ));
    }

    #[test]
    fn test_execute_with_options_overrides_defaults() {
        let engine = Engine::default();
        let bytecode = engine
            .compile(&single(Expression::infix(int(1), InfixOp::Add, int(2))))
            .unwrap();
        assert!(
            engine
                .execute_with_options(&bytecode, &ExecutionOptions { stack_size: 1 })
                .is_err()
        );
        assert_eq!(engine.execute(&bytecode).unwrap(), Some(Value::Integer(3)));
    }

    #[test]
    fn test_result_follows_artifact_not_engine_defaults() {
        let program = single(Expression::infix(int(1), InfixOp::Add, int(2)));
        let stack_top_engine = Engine::default();
        let popping_engine = Engine::new(EngineOptions {
            default_compilation_options: CompilationOptions {
                pop_expression_results: true,
            },
            ..Default::default()
        });

        let popped = stack_top_engine
            .compile_with_options(
                &program,
                CompilationOptions {
                    pop_expression_results: true,
                },
            )
            .unwrap();
        assert_eq!(
            stack_top_engine.execute(&popped).unwrap(),
            Some(Value::Integer(3))
        );

        let kept = popping_engine
            .compile_with_options(&program, CompilationOptions::default())
            .unwrap();
        assert_eq!(popping_engine.execute(&kept).unwrap(), Some(Value::Integer(3)));
    }

    #[test]
    fn test_huge_stack_size() {
        let engine = Engine::new(EngineOptions {
            default_execution_options: ExecutionOptions {
                stack_size: usize::MAX / 8,
            },
            ..Default::default()
        });
        let result = engine.eval(&single(Expression::infix(int(1), InfixOp::Add, int(2))));
        assert_eq!(result.unwrap(), Some(Value::Integer(3)));
    }
}
