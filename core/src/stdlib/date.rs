//! Date Package
//!
//! Dates are UTC millisecond timestamps. The package never reads the
//! clock; the only ways to get a date are host inputs and `parse`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::api::Error;
use crate::evaluator::{CallContext, EvalError, LibraryBuilder};
use crate::values::Value;

use super::args;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(text: &str) -> Option<i64> {
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return day
            .and_hms_opt(0, 0, 0)
            .map(|midnight: NaiveDateTime| midnight.and_utc().timestamp_millis());
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

fn date_parse(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let text = args::string("std.date.parse", args, 0)?;
    parse_date(text)
        .map(Value::Date)
        .ok_or_else(|| EvalError::Other(format!("std.date.parse: invalid date `{text}`")))
}

/// Whole and fractional days from the first date to the second.
fn date_days_between(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    let from = args::date("std.date.days_between", args, 0)?;
    let to = args::date("std.date.days_between", args, 1)?;
    Ok(Value::Number((to as f64 - from as f64) / MILLIS_PER_DAY))
}

fn date_add_days(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
    const NAME: &str = "std.date.add_days";
    let date = args::date(NAME, args, 0)?;
    let days = args::number(NAME, args, 1)?;
    let shifted = date as f64 + (days * MILLIS_PER_DAY).round();
    // Stay within the range chrono can format.
    match DateTime::from_timestamp_millis(shifted as i64) {
        Some(_) if shifted.abs() < 8.64e15 => Ok(Value::Date(shifted as i64)),
        _ => Err(EvalError::non_finite(format!("{NAME}: date out of range"))),
    }
}

/// Register the date package under `std.date`.
pub fn register(builder: LibraryBuilder) -> Result<LibraryBuilder, Error> {
    builder
        .function("date.parse", date_parse)?
        .function("date.days_between", date_days_between)?
        .function("date.add_days", date_add_days)
}
