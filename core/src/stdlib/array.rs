//! Array Package
//!
//! Aggregates and higher-order helpers registered directly under `std`:
//! sum, mean, count, map, filter, range.

use crate::api::Error;
use crate::evaluator::{CallContext, EvalError, LibraryBuilder};
use crate::values::Value;

use super::args;

/// Largest array `std.range` will build.
pub const MAX_RANGE_LEN: usize = 1_000_000;

fn sum(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let values = args::numbers("std.sum", args, 0)?;
    args::finite("std.sum", values.iter().sum())
}

fn mean(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let values = args::numbers("std.mean", args, 0)?;
    if values.is_empty() {
        return Err(EvalError::Other("std.mean of an empty array".to_string()));
    }
    args::finite("std.mean", values.iter().sum::<f64>() / values.len() as f64)
}

fn count(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let items = args::array("std.count", args, 0)?;
    Ok(Value::Number(items.len() as f64))
}

/// `std.map(xs, (x, i) => ...)`
fn map(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let items = args::array("std.map", args, 0)?;
    let f = args::function("std.map", args, 1)?;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        out.push(ctx.invoke(f, &[item.clone(), Value::Number(i as f64)])?);
    }
    Ok(Value::array(out))
}

/// `std.filter(xs, (x, i) => ...)`; the predicate must return a boolean.
fn filter(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let items = args::array("std.filter", args, 0)?;
    let f = args::function("std.filter", args, 1)?;
    let mut out = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let keep = ctx.invoke(f, &[item.clone(), Value::Number(i as f64)])?;
        match keep {
            Value::Boolean(true) => out.push(item.clone()),
            Value::Boolean(false) => {}
            other => {
                return Err(EvalError::type_mismatch(
                    "std.filter predicate",
                    "boolean",
                    other.kind(),
                ));
            }
        }
    }
    Ok(Value::array(out))
}

/// `std.range(end)` or `std.range(start, end)`: integers from `start`
/// (default 0) up to but excluding `end`.
fn range(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    const NAME: &str = "std.range";
    let (start, end) = match args::optional_number(NAME, args, 1)? {
        Some(end) => (args::number(NAME, args, 0)?, end),
        None => (0.0, args::number(NAME, args, 0)?),
    };
    if start.fract() != 0.0 || end.fract() != 0.0 {
        return Err(EvalError::Other(format!("{NAME} bounds must be integers")));
    }
    let len = (end - start).max(0.0);
    if len > MAX_RANGE_LEN as f64 {
        return Err(EvalError::Other(format!(
            "{NAME} would produce {len} elements, more than {MAX_RANGE_LEN}"
        )));
    }
    let len = len as usize;
    ctx.charge(len)?;
    Ok(Value::numbers((0..len).map(|i| start + i as f64)))
}

/// Register the array helpers directly under `std`.
pub fn register(builder: LibraryBuilder) -> Result<LibraryBuilder, Error> {
    builder
        .function("sum", sum)?
        .function("mean", mean)?
        .function("count", count)?
        .function("map", map)?
        .function("filter", filter)?
        .function("range", range)
}
