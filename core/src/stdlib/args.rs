//! Argument extraction helpers for native functions.
//!
//! Natives receive whatever the caller passed, so every argument is checked
//! here and turned into a type-mismatch naming the function and position.

use crate::evaluator::{CallContext, EvalError};
use crate::values::Value;

const ABSENT: &Value = &Value::Absent;

fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(ABSENT)
}

fn mismatch(name: &str, index: usize, expected: &'static str, found: &Value) -> EvalError {
    EvalError::type_mismatch(format!("{name} argument {}", index + 1), expected, found.kind())
}

pub fn value<'v>(name: &str, args: &'v [Value], index: usize) -> Result<&'v Value, EvalError> {
    match arg(args, index) {
        Value::Absent => Err(mismatch(name, index, "a value", &Value::Absent)),
        value => Ok(value),
    }
}

pub fn number(name: &str, args: &[Value], index: usize) -> Result<f64, EvalError> {
    match arg(args, index) {
        Value::Number(n) if n.is_finite() => Ok(*n),
        Value::Number(n) => Err(EvalError::non_finite(format!("{name} received {n}"))),
        other => Err(mismatch(name, index, "number", other)),
    }
}

pub fn optional_number(name: &str, args: &[Value], index: usize) -> Result<Option<f64>, EvalError> {
    match arg(args, index) {
        Value::Absent => Ok(None),
        _ => number(name, args, index).map(Some),
    }
}

pub fn string<'v>(name: &str, args: &'v [Value], index: usize) -> Result<&'v str, EvalError> {
    match arg(args, index) {
        Value::String(s) => Ok(s),
        other => Err(mismatch(name, index, "string", other)),
    }
}

pub fn array<'v>(name: &str, args: &'v [Value], index: usize) -> Result<&'v [Value], EvalError> {
    match arg(args, index) {
        Value::Array(items) => Ok(items),
        other => Err(mismatch(name, index, "array", other)),
    }
}

pub fn date(name: &str, args: &[Value], index: usize) -> Result<i64, EvalError> {
    match arg(args, index) {
        Value::Date(millis) => Ok(*millis),
        other => Err(mismatch(name, index, "date", other)),
    }
}

pub fn function<'v>(name: &str, args: &'v [Value], index: usize) -> Result<&'v Value, EvalError> {
    match arg(args, index) {
        value if value.is_function() => Ok(value),
        other => Err(mismatch(name, index, "function", other)),
    }
}

/// Every element of an array argument as a finite number.
pub fn numbers(name: &str, args: &[Value], index: usize) -> Result<Vec<f64>, EvalError> {
    array(name, args, index)?
        .iter()
        .map(|item| match item {
            Value::Number(n) if n.is_finite() => Ok(*n),
            Value::Number(n) => Err(EvalError::non_finite(format!("{name} received {n}"))),
            other => Err(mismatch(name, index, "array of numbers", other)),
        })
        .collect()
}

/// Apply `f` to a number, or element-wise to an array of numbers.
pub fn numeric_map(
    ctx: &mut CallContext<'_, '_>,
    name: &str,
    args: &[Value],
    f: impl Fn(f64) -> f64,
) -> Result<Value, EvalError> {
    let checked = |n: f64| {
        let out = f(n);
        if out.is_finite() {
            Ok(Value::Number(out))
        } else {
            Err(EvalError::non_finite(format!("{name}({n}) is {out}")))
        }
    };
    match arg(args, 0) {
        Value::Array(_) => {
            let items = numbers(name, args, 0)?;
            ctx.charge(items.len())?;
            items
                .into_iter()
                .map(checked)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::array)
        }
        _ => checked(number(name, args, 0)?),
    }
}

/// Reject a non-finite result.
pub fn finite(name: &str, n: f64) -> Result<Value, EvalError> {
    if n.is_finite() {
        Ok(Value::Number(n))
    } else {
        Err(EvalError::non_finite(format!("{name} produced {n}")))
    }
}
