//! Benchmarks for the CalcScript evaluator.
//!
//! Run with: `cargo bench` in the core/ directory.
//!
//! Benchmark groups:
//! 1. eval_only: evaluation of a pre-parsed arithmetic chain
//! 2. full_pipeline: split + parse + validate + schedule + evaluate a block
//! 3. broadcast: element-wise arithmetic and aggregation over input arrays

use std::rc::Rc;

use calcscript_core::api::{Engine, EngineOptions};
use calcscript_core::evaluator::{self, Library};
use calcscript_core::parser;
use calcscript_core::scope::Scope;
use calcscript_core::stdlib::standard_library;
use calcscript_core::values::Value;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// Generate an arithmetic expression like "1 + 1 + ... + 1" with `n` additions.
fn generate_arithmetic_chain(n: usize) -> String {
    let mut expr = String::from("1");
    for _ in 0..n {
        expr.push_str(" + 1");
    }
    expr
}

/// Generate a block of `n` declarations, each depending on the previous one.
fn generate_declaration_chain(n: usize) -> String {
    let mut block = String::from("const n0 = 1;\n");
    for i in 1..n {
        block.push_str(&format!("const n{i} = n{} * 2 - n{} + 1;\n", i - 1, i - 1));
    }
    block
}

fn bench_eval_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval_only");
    let library = Library::empty();
    let scope = Rc::new(Scope::root());

    // Chains stay under the parser's tree height limit.
    for size in [25, 50, 100] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let expr = parser::parse(&generate_arithmetic_chain(size)).expect("Parse failed");
            b.iter(|| {
                let value = evaluator::eval(
                    black_box(&library),
                    EngineOptions::default(),
                    black_box(&expr),
                    &scope,
                );
                black_box(value.expect("Eval failed"))
            });
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let engine = Engine::new(
        EngineOptions::default(),
        standard_library().expect("library"),
        |_| Ok(()),
    )
    .expect("engine");

    for size in [10, 100, 500] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let block = generate_declaration_chain(size);
            b.iter(|| {
                let result = engine.evaluate_block(black_box(&block));
                assert!(result.diagnostics.is_empty());
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");

    for size in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let engine = Engine::new(
                EngineOptions::default(),
                standard_library().expect("library"),
                |env| env.register("xs", Value::numbers((0..size).map(|i| i as f64))),
            )
            .expect("engine");
            let graph = engine.compile_block(
                "const scaled = xs * 1.5 + 2;\nconst total = std.sum(scaled);",
                1,
            );
            b.iter(|| black_box(engine.run(black_box(&graph))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_eval_only, bench_full_pipeline, bench_broadcast);
criterion_main!(benches);
