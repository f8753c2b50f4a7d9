//! Math Package
//!
//! Functions: abs, round, floor, ceil, sqrt, min, max, pow
//!
//! The unary functions also accept an array of numbers and apply
//! element-wise, like the arithmetic operators.

use crate::evaluator::{CallContext, EvalError, LibraryBuilder};
use crate::api::Error;
use crate::values::Value;

use super::args;

// ============================================================================
// Element-wise Functions
// ============================================================================

fn math_abs(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    args::numeric_map(ctx, "std.math.abs", args, f64::abs)
}

fn math_floor(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    args::numeric_map(ctx, "std.math.floor", args, f64::floor)
}

fn math_ceil(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    args::numeric_map(ctx, "std.math.ceil", args, f64::ceil)
}

/// Square root. Negative input has no finite result and fails.
fn math_sqrt(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    args::numeric_map(ctx, "std.math.sqrt", args, f64::sqrt)
}

/// Round half away from zero, optionally to a number of decimal digits.
fn math_round(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    const NAME: &str = "std.math.round";
    let digits = args::optional_number(NAME, args, 1)?.unwrap_or(0.0);
    if digits.fract() != 0.0 || !(0.0..=15.0).contains(&digits) {
        return Err(EvalError::Other(format!(
            "{NAME}: digits must be an integer between 0 and 15, got {digits}"
        )));
    }
    let scale = 10f64.powi(digits as i32);
    args::numeric_map(ctx, NAME, &args[..1.min(args.len())], |n| {
        let scaled = n * scale;
        // At 2^52 and above every f64 is already an integer.
        if scaled.is_finite() && scaled.abs() < 4_503_599_627_370_496.0 {
            scaled.round() / scale
        } else {
            n
        }
    })
}

// ============================================================================
// Aggregates
// ============================================================================

/// Numbers from either a single array argument or the argument list itself.
fn spread(name: &str, args: &[Value]) -> Result<Vec<f64>, EvalError> {
    match args {
        [Value::Array(_)] => args::numbers(name, args, 0),
        _ => (0..args.len()).map(|i| args::number(name, args, i)).collect(),
    }
}

fn math_min(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let values = spread("std.math.min", args)?;
    values
        .into_iter()
        .reduce(f64::min)
        .map(Value::Number)
        .ok_or_else(|| EvalError::Other("std.math.min needs at least one number".to_string()))
}

fn math_max(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let values = spread("std.math.max", args)?;
    values
        .into_iter()
        .reduce(f64::max)
        .map(Value::Number)
        .ok_or_else(|| EvalError::Other("std.math.max needs at least one number".to_string()))
}

fn math_pow(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let base = args::number("std.math.pow", args, 0)?;
    let exponent = args::number("std.math.pow", args, 1)?;
    args::finite("std.math.pow", base.powf(exponent))
}

/// Register the math package under `std.math`.
pub fn register(builder: LibraryBuilder) -> Result<LibraryBuilder, Error> {
    builder
        .function("math.abs", math_abs)?
        .function("math.round", math_round)?
        .function("math.floor", math_floor)?
        .function("math.ceil", math_ceil)?
        .function("math.sqrt", math_sqrt)?
        .function("math.min", math_min)?
        .function("math.max", math_max)?
        .function("math.pow", math_pow)?
        .constant("math.pi", Value::Number(std::f64::consts::PI))
}
