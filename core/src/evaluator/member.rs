//! Property access.

use crate::evaluator::{EvalError, Evaluator};
use crate::is_banned_name;
use crate::values::Value;

/// Array methods that would mutate in a host language. Reading any of them
/// is refused rather than treated as a column name.
pub const ARRAY_MUTATORS: [&str; 9] = [
    "push",
    "pop",
    "shift",
    "unshift",
    "splice",
    "sort",
    "reverse",
    "fill",
    "copyWithin",
];

/// Read `property` from `object`.
///
/// Records expose their own keys only. Arrays expose `length`; any other
/// allowed name projects that column out of an array of records, failing on
/// the first element that does not own the key.
pub(super) fn access(
    ev: &mut Evaluator<'_>,
    object: &Value,
    property: &str,
) -> Result<Value, EvalError> {
    if is_banned_name(property) {
        return Err(EvalError::DisallowedProperty {
            property: property.to_string(),
        });
    }
    match object {
        Value::Record(record) => {
            record
                .get(property)
                .cloned()
                .ok_or_else(|| EvalError::UnknownProperty {
                    property: property.to_string(),
                    on: "record".to_string(),
                })
        }
        Value::Array(items) => {
            if property == "length" {
                return Ok(Value::Number(items.len() as f64));
            }
            if ARRAY_MUTATORS.contains(&property) {
                return Err(EvalError::DisallowedProperty {
                    property: property.to_string(),
                });
            }
            ev.charge(items.len())?;
            let column = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    item.as_record()
                        .and_then(|row| row.get(property))
                        .cloned()
                        .ok_or_else(|| EvalError::MissingColumn {
                            property: property.to_string(),
                            index,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::array(column))
        }
        other => Err(EvalError::UnknownProperty {
            property: property.to_string(),
            on: other.kind().to_string(),
        }),
    }
}
