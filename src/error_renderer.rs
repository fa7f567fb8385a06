//! Error rendering using miette
//!
//! Turns a Quill [`Error`] into a diagnostic with a stable error code and,
//! where one applies, a hint on how to fix it.

use std::fmt;
use std::io::Write;

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use quill_core::{
    compiler::CompileError,
    vm::{ResourceExceededError, RuntimeError},
};

use crate::Error;

/// A rendered-ready view of an [`Error`].
///
/// Owns everything it needs, so it can be turned into a [`miette::Report`]
/// and returned from `main`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ErrorReport {
    message: String,
    code: &'static str,
    help: Option<&'static str>,
}

impl ErrorReport {
    /// Stable identifier of the error kind, e.g. `quill::runtime::type_mismatch`.
    pub fn error_code(&self) -> &'static str {
        self.code
    }
}

impl Diagnostic for ErrorReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }
}

impl From<&Error> for ErrorReport {
    fn from(error: &Error) -> Self {
        let (code, help) = match error {
            Error::Compilation(CompileError::Unsupported { .. }) => (
                "quill::compile::unsupported",
                Some("only integer and boolean literals combined with + - * / can be compiled"),
            ),
            Error::Compilation(CompileError::TooManyConstants { .. }) => (
                "quill::compile::too_many_constants",
                Some("split the program; a constant pool is addressed by 16-bit indices"),
            ),
            Error::Compilation(CompileError::Encoding(_)) => ("quill::compile::encoding", None),
            Error::Runtime(RuntimeError::UnknownOpcode { .. }) => (
                "quill::runtime::unknown_opcode",
                Some("the artifact is corrupt or was produced by a newer compiler"),
            ),
            Error::Runtime(RuntimeError::TruncatedInstruction { .. }) => (
                "quill::runtime::truncated_instruction",
                Some("the artifact is corrupt or was cut short"),
            ),
            Error::Runtime(RuntimeError::ConstantOutOfRange { .. }) => (
                "quill::runtime::constant_out_of_range",
                Some("the artifact is corrupt or was cut short"),
            ),
            Error::Runtime(RuntimeError::TypeMismatch { .. }) => (
                "quill::runtime::type_mismatch",
                Some("arithmetic operators only accept Integer operands"),
            ),
            Error::Runtime(RuntimeError::DivisionByZero) => ("quill::runtime::division_by_zero", None),
            Error::Runtime(RuntimeError::IntegerOverflow { .. }) => (
                "quill::runtime::integer_overflow",
                Some("integers are 64-bit signed"),
            ),
            Error::Runtime(RuntimeError::StackUnderflow) => (
                "quill::runtime::stack_underflow",
                Some("the artifact pops more values than it pushes"),
            ),
            Error::ResourceExceeded(ResourceExceededError::StackOverflow { .. }) => (
                "quill::resource::stack_overflow",
                Some("raise the stack size or simplify the program"),
            ),
            Error::Artifact(_) => (
                "quill::artifact",
                Some("the file is not a bytecode artifact written by this version of quill"),
            ),
        };
        ErrorReport {
            message: error.to_string(),
            code,
            help,
        }
    }
}

impl From<Error> for ErrorReport {
    fn from(error: Error) -> Self {
        ErrorReport::from(&error)
    }
}

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use quill::{Engine, EngineOptions, render_error};
/// use quill::ast::{Expression, Program, Statement};
///
/// let engine = Engine::new(EngineOptions::default());
/// let program = Program::new(vec![Statement::Return(Expression::IntegerLiteral(1))]);
/// if let Err(e) = engine.compile(&program) {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(error: &Error) -> String {
    render(error, true)
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error) -> String {
    render(error, false)
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    writer.write_all(render(error, use_color).as_bytes())
}

fn render(error: &Error, use_color: bool) -> String {
    let theme = if use_color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let report = ErrorReport::from(error);
    let mut out = String::new();
    // Falls back to the plain message if the handler fails to format.
    if GraphicalReportHandler::new_themed(theme)
        .with_width(120)
        .render_report(&mut out, &report)
        .is_err()
    {
        out = format!("Error: {}\n", report);
    }
    out
}
