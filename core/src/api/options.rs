//! Configuration options for the Quill engine.

use crate::vm::STACK_SIZE;

/// Configuration options for compilation.
///
/// # Example
///
/// ```
/// use quill_core::api::CompilationOptions;
///
/// let options = CompilationOptions {
///     pop_expression_results: true,
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Emit `OpPop` after every expression statement.
    ///
    /// Keeps the stack balanced across statements; the result of the last
    /// one is then read back with `last_popped_stack_elem`.
    ///
    /// Default: false (results stay on the stack)
    pub pop_expression_results: bool,
}

/// Configuration options for bytecode execution.
///
/// # Example
///
/// ```
/// use quill_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions { stack_size: 64 };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Operand stack capacity, in values.
    ///
    /// Default: 2048
    pub stack_size: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            stack_size: STACK_SIZE,
        }
    }
}

/// Configuration options for the Quill engine.
///
/// These options set the defaults for compilation and execution,
/// which can be overridden on a per-call basis.
///
/// # Example
///
/// ```
/// use quill_core::api::{CompilationOptions, EngineOptions, ExecutionOptions};
///
/// let options = EngineOptions {
///     default_compilation_options: CompilationOptions::default(),
///     default_execution_options: ExecutionOptions { stack_size: 256 },
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// These can be overridden when calling `Engine::compile_with_options()`.
    pub default_compilation_options: CompilationOptions,

    /// These can be overridden when calling `Engine::execute_with_options()`.
    pub default_execution_options: ExecutionOptions,
}
