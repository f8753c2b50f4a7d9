use core::fmt;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::evaluator::EvalError;
use crate::parser::write_quoted;

use super::{Closure, NativeFunction, Record};

/// Runtime value. Every operation checks the tag explicitly; nothing is
/// coerced implicitly.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    /// Milliseconds since the Unix epoch, UTC.
    Date(i64),
    Array(Rc<Vec<Value>>),
    Record(Rc<Record>),
    Closure(Rc<Closure>),
    Native(NativeFunction),
    /// Stands in for a missing function argument.
    Absent,
    /// Placeholder for the result of a node that failed.
    Error(Rc<ErrorSentinel>),
}

/// What a failed node leaves behind in the environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSentinel {
    /// The node whose own evaluation failed first.
    pub failed_node: String,
    pub message: String,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Rc::new(items.into_iter().collect()))
    }

    pub fn numbers(items: impl IntoIterator<Item = f64>) -> Self {
        Value::array(items.into_iter().map(Value::Number))
    }

    /// Build a record, refusing banned keys.
    pub fn record<K: Into<String>>(
        fields: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Self, EvalError> {
        let mut record = Record::new();
        for (key, value) in fields {
            record.insert(key, value)?;
        }
        Ok(Value::Record(Rc::new(record)))
    }

    /// Midnight UTC of the given calendar day.
    pub fn date(year: i32, month: u32, day: u32) -> Option<Self> {
        let midnight = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
        Some(Value::Date(midnight.and_utc().timestamp_millis()))
    }

    pub fn error(failed_node: impl Into<String>, message: impl Into<String>) -> Self {
        Value::Error(Rc::new(ErrorSentinel {
            failed_node: failed_node.into(),
            message: message.into(),
        }))
    }

    /// Name of the value's kind, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::Closure(_) | Value::Native(_) => "function",
            Value::Absent => "absent value",
            Value::Error(_) => "error",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorSentinel> {
        match self {
            Value::Error(sentinel) => Some(sentinel),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Native(_))
    }
}

/// Text form of a number as used by `&` and by display.
///
/// Integral values print without a fractional part and `-0` prints as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{n:.0}");
    }
    format!("{n}")
}

fn format_date(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) if dt.timestamp_millis() % 86_400_000 == 0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        None => format!("@{millis}"),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.ptr_eq(b),
            (Value::Absent, Value::Absent) => true,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => write_quoted(f, s),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Date(millis) => write!(f, "date({})", format_date(*millis)),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Record(record) => {
                if record.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, (key, value)) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str(" }")
            }
            Value::Closure(closure) => write!(f, "<function ({})>", closure.params.join(", ")),
            Value::Native(native) => write!(f, "<function {}>", native.name()),
            Value::Absent => f.write_str("<absent>"),
            Value::Error(sentinel) => write!(f, "<error in {}>", sentinel.failed_node),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Date(millis) => serializer.serialize_str(&format_date(*millis)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for (key, value) in record.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Closure(_) | Value::Native(_) => serializer.serialize_str(&self.to_string()),
            Value::Absent => serializer.serialize_none(),
            Value::Error(sentinel) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", sentinel.as_ref())?;
                map.end()
            }
        }
    }
}
