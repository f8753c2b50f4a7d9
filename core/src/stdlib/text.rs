//! Text Package
//!
//! - `len` counts Unicode scalar values, not bytes
//! - `join` accepts strings and numbers, formatting numbers like `&`

use crate::api::Error;
use crate::evaluator::{CallContext, EvalError, LibraryBuilder};
use crate::values::{Value, format_number};

use super::args;

fn text_upper(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::string(args::string("std.text.upper", args, 0)?.to_uppercase()))
}

fn text_lower(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::string(args::string("std.text.lower", args, 0)?.to_lowercase()))
}

fn text_len(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let s = args::string("std.text.len", args, 0)?;
    Ok(Value::Number(s.chars().count() as f64))
}

fn text_join(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    const NAME: &str = "std.text.join";
    let items = args::array(NAME, args, 0)?;
    let separator = match args.get(1) {
        None | Some(Value::Absent) => "",
        Some(_) => args::string(NAME, args, 1)?,
    };
    ctx.charge(items.len())?;
    let parts = items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) if n.is_finite() => Ok(format_number(*n)),
            other => Err(EvalError::type_mismatch(
                format!("{NAME} element"),
                "string or number",
                other.kind(),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::string(parts.join(separator)))
}

/// Register the text package under `std.text`.
pub fn register(builder: LibraryBuilder) -> Result<LibraryBuilder, Error> {
    builder
        .function("text.upper", text_upper)?
        .function("text.lower", text_lower)?
        .function("text.len", text_len)?
        .function("text.join", text_join)
}
