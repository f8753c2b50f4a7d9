//! Shared harness for the language tests.
//!
//! Each `test_case!` evaluates `input` as the body of a single declaration
//! against a fixed environment and checks any of: the canonical text of the
//! parsed expression, the resulting value, or the code of the first
//! diagnostic.

#![allow(dead_code)]

use calcscript::{Code, Engine, EngineOptions, Value, standard_library};
use calcscript_core::parser;

macro_rules! test_case {
    (
        $name:ident,
        input: $input:expr
        $(, canonical: $canonical:expr)?
        $(, value: $value:expr)?
        $(, error: $error:expr)?
        $(,)?
    ) => {
        #[test]
        fn $name() {
            use pretty_assertions::assert_eq;

            let input = $input;
            $(
                assert_eq!(
                    crate::cases::canonical(input).as_deref(),
                    Ok($canonical),
                    "canonical form of {input:?}"
                );
            )?
            $(
                assert_eq!(crate::cases::evaluate(input), Ok($value), "value of {input:?}");
            )?
            $(
                assert_eq!(crate::cases::evaluate(input), Err($error), "error from {input:?}");
            )?
        }
    };
}

pub fn engine() -> Engine {
    Engine::new(EngineOptions::default(), standard_library().unwrap(), |env| {
        env.register("xs", nums([1.0, 2.0, 3.0]))?;
        env.register("ys", nums([4.0, 5.0, 6.0]))?;
        env.register("name", text("Ada"))?;
        env.register("today", Value::date(2024, 3, 15).unwrap())?;
        env.register(
            "rows",
            Value::array([
                row("north", 120.0, 2.0),
                row("south", 80.0, 5.0),
                row("east", 200.0, 1.0),
            ]),
        )?;
        env.register(
            "config",
            Value::record([("rate", num(0.25)), ("label", text("VAT"))]).unwrap(),
        )
    })
    .unwrap()
}

fn row(region: &str, price: f64, qty: f64) -> Value {
    Value::record([
        ("region", text(region)),
        ("price", num(price)),
        ("qty", num(qty)),
    ])
    .unwrap()
}

/// Value of `const result = <input>;`, or the code of the first
/// diagnostic.
pub fn evaluate(input: &str) -> Result<Value, Code> {
    let result = engine().evaluate_block(&format!("const result = {input}\n;"));
    match result.diagnostics.first() {
        Some(diagnostic) => Err(diagnostic.code),
        None => result.value("result").cloned().ok_or(Code::EvalError),
    }
}

/// Canonical text of the parsed expression.
pub fn canonical(input: &str) -> Result<String, String> {
    parser::parse(input)
        .map(|expr| expr.to_string())
        .map_err(|e| e.to_string())
}

pub fn num(n: f64) -> Value {
    Value::Number(n)
}

pub fn nums<const N: usize>(items: [f64; N]) -> Value {
    Value::numbers(items)
}

pub fn text(s: &str) -> Value {
    Value::string(s)
}
