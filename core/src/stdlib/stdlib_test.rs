//! Tests for the reference standard library, run through the engine.

use pretty_assertions::assert_eq;

use super::*;
use crate::api::{Code, Engine, EngineOptions};
use crate::evaluator::EvalError;
use crate::values::Value;

fn engine() -> Engine {
    crate::test_utils::init_test_logging();
    Engine::new(EngineOptions::default(), standard_library().unwrap(), |env| {
        env.register("xs", Value::numbers([3.0, 1.0, 2.0]))?;
        env.register("start", Value::date(2024, 1, 31).unwrap())?;
        env.register("words", Value::array([Value::string("a"), Value::string("b")]))
    })
    .unwrap()
}

fn eval(source: &str) -> Result<Value, Code> {
    let result = engine().evaluate_block(&format!("const out = {source};"));
    match result.diagnostics.first() {
        Some(diagnostic) => Err(diagnostic.code),
        None => Ok(result.value("out").cloned().unwrap()),
    }
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn test_library_is_enumerable() {
    let library = standard_library().unwrap();
    let root = library.root().as_record().unwrap();
    let mut names: Vec<&str> = root.keys().collect();
    names.sort();
    assert_eq!(
        names,
        vec!["count", "date", "filter", "map", "math", "mean", "range", "sum", "text"]
    );
    assert_eq!(library.len(), 21);
}

// ============================================================================
// Math
// ============================================================================

#[test]
fn test_math_scalars() {
    assert_eq!(eval("std.math.abs(-2.5)"), Ok(num(2.5)));
    assert_eq!(eval("std.math.floor(2.7)"), Ok(num(2.0)));
    assert_eq!(eval("std.math.ceil(2.1)"), Ok(num(3.0)));
    assert_eq!(eval("std.math.sqrt(16)"), Ok(num(4.0)));
    assert_eq!(eval("std.math.pow(2, 8)"), Ok(num(256.0)));
    assert_eq!(eval("std.math.round(2.5)"), Ok(num(3.0)));
    assert_eq!(eval("std.math.round(-2.5)"), Ok(num(-3.0)));
    assert_eq!(eval("std.math.round(1.2345, 2)"), Ok(num(1.23)));
    assert_eq!(eval("std.math.round(1e300, 10)"), Ok(num(1e300)));
    assert_eq!(eval("std.math.round(-1e300, 15)"), Ok(num(-1e300)));
    assert_eq!(eval("std.math.round(9007199254740993, 0)"), Ok(num(9007199254740993.0)));
}

#[test]
fn test_math_element_wise() {
    assert_eq!(eval("std.math.abs(-xs)"), Ok(Value::numbers([3.0, 1.0, 2.0])));
}

#[test]
fn test_math_min_max() {
    assert_eq!(eval("std.math.min(xs)"), Ok(num(1.0)));
    assert_eq!(eval("std.math.max(4, 9, 2)"), Ok(num(9.0)));
    assert_eq!(eval("std.math.max()"), Err(Code::EvalError));
}

#[test]
fn test_math_failures() {
    assert_eq!(eval("std.math.sqrt(-1)"), Err(Code::NonFinite));
    assert_eq!(eval("std.math.pow(10, 400)"), Err(Code::NonFinite));
    assert_eq!(eval("std.math.abs('x')"), Err(Code::TypeMismatch));
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn test_aggregates() {
    assert_eq!(eval("std.sum(xs)"), Ok(num(6.0)));
    assert_eq!(eval("std.mean(xs)"), Ok(num(2.0)));
    assert_eq!(eval("std.count(words)"), Ok(num(2.0)));
    assert_eq!(eval("std.sum(std.range(0))"), Ok(num(0.0)));
    assert_eq!(eval("std.mean(std.range(0))"), Err(Code::EvalError));
}

#[test]
fn test_range() {
    assert_eq!(eval("std.range(3)"), Ok(Value::numbers([0.0, 1.0, 2.0])));
    assert_eq!(eval("std.range(2, 4)"), Ok(Value::numbers([2.0, 3.0])));
    assert_eq!(eval("std.range(4, 2)"), Ok(Value::numbers([])));
    assert_eq!(eval("std.range(1.5)"), Err(Code::EvalError));
}

#[test]
fn test_map_and_filter() {
    assert_eq!(
        eval("std.map(xs, (x, i) => x * 10 + i)"),
        Ok(Value::numbers([30.0, 11.0, 22.0]))
    );
    assert_eq!(
        eval("std.filter(xs, x => x >= 2)"),
        Ok(Value::numbers([3.0, 2.0]))
    );
    assert_eq!(eval("std.filter(xs, x => x)"), Err(Code::TypeMismatch));
    assert_eq!(eval("std.map(xs, 1)"), Err(Code::TypeMismatch));
}

#[test]
fn test_map_errors_propagate() {
    assert_eq!(eval("std.map(xs, x => x / 0)"), Err(Code::DivisionByZero));
}

#[test]
fn test_map_accepts_library_functions() {
    assert_eq!(
        eval("std.map(-xs, std.math.abs)"),
        Ok(Value::numbers([3.0, 1.0, 2.0]))
    );
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_text() {
    assert_eq!(eval("std.text.upper('abc')"), Ok(Value::string("ABC")));
    assert_eq!(eval("std.text.lower('ÀB')"), Ok(Value::string("àb")));
    assert_eq!(eval("std.text.len('héllo')"), Ok(num(5.0)));
    assert_eq!(eval("std.text.join(words, '-')"), Ok(Value::string("a-b")));
    assert_eq!(eval("std.text.join(xs)"), Ok(Value::string("312")));
}

// ============================================================================
// Dates
// ============================================================================

#[test]
fn test_dates() {
    assert_eq!(
        eval("std.date.add_days(start, 1)"),
        Ok(Value::date(2024, 2, 1).unwrap())
    );
    assert_eq!(
        eval("std.date.days_between(start, std.date.parse('2024-03-01'))"),
        Ok(num(30.0))
    );
    assert_eq!(eval("start < std.date.add_days(start, 1)"), Ok(Value::Boolean(true)));
    assert_eq!(eval("std.date.parse('31/01/2024')"), Err(Code::EvalError));
    assert_eq!(eval("std.date.add_days(1, 1)"), Err(Code::TypeMismatch));
}

#[test]
fn test_days_between_extreme_dates() {
    let engine = Engine::new(EngineOptions::default(), standard_library().unwrap(), |env| {
        env.register("first", Value::Date(i64::MIN))?;
        env.register("last", Value::Date(i64::MAX))
    })
    .unwrap();
    let result = engine.evaluate_block("const span = std.date.days_between(first, last);");
    assert!(result.diagnostics.is_empty());
    let expected = (i64::MAX as f64 - i64::MIN as f64) / 86_400_000.0;
    assert_eq!(result.value("span"), Some(&num(expected)));
}

#[test]
fn test_parse_date_formats() {
    assert_eq!(
        date::parse_date("2024-01-31"),
        Value::date(2024, 1, 31).and_then(|v| match v {
            Value::Date(millis) => Some(millis),
            _ => None,
        })
    );
    assert_eq!(date::parse_date("1970-01-01T00:00:01Z"), Some(1000));
    assert_eq!(date::parse_date("yesterday"), None);
}

#[test]
fn test_argument_errors_name_the_function() {
    let err = args::number("std.x", &[Value::string("s")], 0).unwrap_err();
    assert_eq!(err.to_string(), "std.x argument 1 expects number, found string");
    let err = args::string("std.x", &[], 1).unwrap_err();
    assert!(matches!(
        err,
        EvalError::TypeMismatch {
            found: "absent value",
            ..
        }
    ));
}
