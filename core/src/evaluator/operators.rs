//! Binary and unary operator implementations.
//!
//! Arithmetic and `&` broadcast over one level of arrays: scalar with
//! scalar, array with scalar (either side), or two arrays of equal length
//! element by element. Comparison, equality and logic are scalar-only.

use std::cmp::Ordering;

use crate::evaluator::{EvalError, Evaluator};
use crate::parser::BinaryOp;
use crate::values::{Value, format_number};

pub(super) fn binary(
    ev: &mut Evaluator<'_>,
    op: BinaryOp,
    left: &Value,
    right: &Value,
) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Pow => {
            broadcast(ev, op, left, right, |l, r| arithmetic(op, l, r))
        }
        BinaryOp::Concat => broadcast(ev, op, left, right, concat),
        BinaryOp::Eq => equality(op, left, right).map(Value::Boolean),
        BinaryOp::Ne => equality(op, left, right).map(|eq| Value::Boolean(!eq)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(op, left, right)?;
            Ok(Value::Boolean(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        // Short-circuited by the evaluator before operands are combined.
        BinaryOp::And | BinaryOp::Or => {
            let l = left
                .as_bool()
                .ok_or_else(|| EvalError::type_mismatch(op.symbol(), "boolean", left.kind()))?;
            let r = right
                .as_bool()
                .ok_or_else(|| EvalError::type_mismatch(op.symbol(), "boolean", right.kind()))?;
            Ok(Value::Boolean(if op == BinaryOp::And { l && r } else { l || r }))
        }
    }
}

/// Unary minus over a number or an array of numbers.
pub(super) fn negate(ev: &mut Evaluator<'_>, value: &Value) -> Result<Value, EvalError> {
    let scalar = |v: &Value| match v {
        Value::Number(n) => Ok(Value::Number(-finite("-", *n)?)),
        other => Err(EvalError::type_mismatch("-", "number", other.kind())),
    };
    match value {
        Value::Array(items) => {
            ev.charge(items.len())?;
            items.iter().map(scalar).collect::<Result<Vec<_>, _>>().map(Value::array)
        }
        other => scalar(other),
    }
}

fn broadcast(
    ev: &mut Evaluator<'_>,
    op: BinaryOp,
    left: &Value,
    right: &Value,
    scalar: impl Fn(&Value, &Value) -> Result<Value, EvalError>,
) -> Result<Value, EvalError> {
    let items: Vec<Value> = match (left, right) {
        (Value::Array(l), Value::Array(r)) => {
            if l.len() != r.len() {
                return Err(EvalError::LengthMismatch {
                    op: op.symbol(),
                    left: l.len(),
                    right: r.len(),
                });
            }
            ev.charge(l.len())?;
            l.iter()
                .zip(r.iter())
                .map(|(a, b)| scalar(a, b))
                .collect::<Result<_, _>>()?
        }
        (Value::Array(l), r) => {
            ev.charge(l.len())?;
            l.iter().map(|a| scalar(a, r)).collect::<Result<_, _>>()?
        }
        (l, Value::Array(r)) => {
            ev.charge(r.len())?;
            r.iter().map(|b| scalar(l, b)).collect::<Result<_, _>>()?
        }
        (l, r) => return scalar(l, r),
    };
    Ok(Value::array(items))
}

fn finite(op: &str, n: f64) -> Result<f64, EvalError> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(EvalError::non_finite(format!("operand of `{op}` is {n}")))
    }
}

fn number_operand(op: BinaryOp, value: &Value) -> Result<f64, EvalError> {
    match value {
        Value::Number(n) => finite(op.symbol(), *n),
        other => Err(EvalError::type_mismatch(op.symbol(), "number", other.kind())),
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let l = number_operand(op, left)?;
    let r = number_operand(op, right)?;
    let result = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div if r == 0.0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Div => l / r,
        _ => l.powf(r),
    };
    if !result.is_finite() {
        return Err(EvalError::non_finite(format!(
            "{} {} {} is {result}",
            format_number(l),
            op.symbol(),
            format_number(r)
        )));
    }
    Ok(Value::Number(result))
}

fn concat(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let mut out = text_operand(left)?;
    out.push_str(&text_operand(right)?);
    Ok(Value::String(out))
}

fn text_operand(value: &Value) -> Result<String, EvalError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(format_number(finite("&", *n)?)),
        other => Err(EvalError::type_mismatch("&", "string or number", other.kind())),
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    let ordering = match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.partial_cmp(r),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Date(l), Value::Date(r)) => Some(l.cmp(r)),
        _ => {
            let orderable = matches!(left, Value::Number(_) | Value::String(_) | Value::Date(_));
            let (expected, found) = if orderable {
                (left.kind(), right.kind())
            } else {
                ("number, string or date", left.kind())
            };
            return Err(EvalError::type_mismatch(op.symbol(), expected, found));
        }
    };
    ordering.ok_or_else(|| {
        EvalError::non_finite(format!("cannot order operands of `{}`", op.symbol()))
    })
}

fn equality(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    for value in [left, right] {
        if matches!(
            value,
            Value::Array(_) | Value::Record(_) | Value::Closure(_) | Value::Native(_)
        ) {
            return Err(EvalError::type_mismatch(op.symbol(), "scalar", value.kind()));
        }
    }
    Ok(left == right)
}
