//! Benchmarks for the Quill compiler and VM.
//!
//! Run with: `cargo bench` in the core/ directory.
//!
//! Benchmark groups:
//! 1. vm_only: Executes pre-compiled bytecode
//! 2. compile_and_run: Compiles the tree and executes it on every iteration

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quill_core::{
    api::CompilationOptions,
    ast::{Expression, InfixOp, Program, Statement},
    compiler::Compiler,
    vm::VM,
};

/// Build `1 + 1 + ... + 1` with `n` additions, left-associated.
fn arithmetic_chain(n: usize) -> Program {
    let mut expression = Expression::IntegerLiteral(1);
    for _ in 0..n {
        expression = Expression::infix(expression, InfixOp::Add, Expression::IntegerLiteral(1));
    }
    Program::new(vec![Statement::Expression(expression)])
}

fn bench_vm_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("vm_only");

    for size in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let bytecode =
                Compiler::compile_program(&arithmetic_chain(size), CompilationOptions::default())
                    .expect("Compilation failed");

            b.iter(|| {
                let mut vm = VM::new(black_box(&bytecode));
                vm.run().expect("Execution failed");
                black_box(vm.stack_top().copied())
            });
        });
    }

    group.finish();
}

fn bench_compile_and_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_and_run");

    for size in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let program = arithmetic_chain(size);

            b.iter(|| {
                let bytecode =
                    Compiler::compile_program(black_box(&program), CompilationOptions::default())
                        .expect("Compilation failed");
                let mut vm = VM::new(&bytecode);
                vm.run().expect("Execution failed");
                black_box(vm.stack_top().copied())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_vm_only, bench_compile_and_run);
criterion_main!(benches);
