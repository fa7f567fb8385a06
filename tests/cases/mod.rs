#![allow(dead_code)]

use once_cell::sync::Lazy;
use quill::ast::{Expression, InfixOp, Program, Statement};
use quill::{CompilationOptions, Engine, EngineOptions};

/// Engine with default options: results stay on the stack.
pub static ENGINE: Lazy<Engine> = Lazy::new(|| Engine::new(EngineOptions::default()));

/// Engine that pops every expression statement's result.
pub static POPPING_ENGINE: Lazy<Engine> = Lazy::new(|| {
    Engine::new(EngineOptions {
        default_compilation_options: CompilationOptions {
            pop_expression_results: true,
        },
        ..Default::default()
    })
});

/// Compile a program, optionally check its disassembly, then run it and match
/// the result against a pattern.
#[macro_export]
macro_rules! test_case {
    (
        $name:ident,
        program: $program:expr,
        $(disassembly: $disassembly:expr,)?
        result: $result:pat $(,)?
    ) => {
        #[test]
        fn $name() {
            let engine = &*$crate::cases::ENGINE;
            let program = $program;
            let bytecode = engine.compile(&program);
            $(
                let listing = bytecode.as_ref().map(|b| b.instructions.to_string());
                pretty_assertions::assert_eq!(listing.ok().as_deref(), Some($disassembly));
            )?
            let result = bytecode.and_then(|b| engine.execute(&b));
            assert!(matches!(result, $result), "unexpected result: {:?}", result);
        }
    };
}

pub fn int(value: i64) -> Expression {
    Expression::IntegerLiteral(value)
}

pub fn boolean(value: bool) -> Expression {
    Expression::Boolean(value)
}

pub fn add(left: Expression, right: Expression) -> Expression {
    Expression::infix(left, InfixOp::Add, right)
}

pub fn sub(left: Expression, right: Expression) -> Expression {
    Expression::infix(left, InfixOp::Sub, right)
}

pub fn mul(left: Expression, right: Expression) -> Expression {
    Expression::infix(left, InfixOp::Mul, right)
}

pub fn div(left: Expression, right: Expression) -> Expression {
    Expression::infix(left, InfixOp::Div, right)
}

/// One expression statement per expression.
pub fn program(expressions: impl IntoIterator<Item = Expression>) -> Program {
    Program::new(
        expressions
            .into_iter()
            .map(Statement::Expression)
            .collect(),
    )
}
