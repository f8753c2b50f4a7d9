#[macro_use]
mod cases;

use calcscript::{Code, Value};
use cases::{num, nums, text};

test_case!(
    length,
    input: "xs.length",
    value: num(3.0),
);

test_case!(
    array_times_scalar,
    input: "xs * 2",
    value: nums([2.0, 4.0, 6.0]),
);

test_case!(
    scalar_minus_array,
    input: "10 - xs",
    value: nums([9.0, 8.0, 7.0]),
);

test_case!(
    element_wise,
    input: "xs * ys",
    value: nums([4.0, 10.0, 18.0]),
);

test_case!(
    negation_broadcasts,
    input: "-xs",
    value: nums([-1.0, -2.0, -3.0]),
);

test_case!(
    concatenation_broadcasts,
    input: "'#' & xs",
    value: Value::array([text("#1"), text("#2"), text("#3")]),
);

test_case!(
    length_mismatch,
    input: "xs + std.range(2)",
    error: Code::LengthMismatch,
);

test_case!(
    broadcasting_is_one_level_deep,
    input: "std.map(xs, x => std.range(2)) * 2",
    error: Code::TypeMismatch,
);

test_case!(
    element_division_by_zero,
    input: "1 / (xs - 2)",
    error: Code::DivisionByZero,
);

test_case!(
    column_projection,
    input: "rows.region",
    value: Value::array([text("north"), text("south"), text("east")]),
);

test_case!(
    projected_columns_combine,
    input: "std.sum(rows.price * rows.qty)",
    value: num(840.0),
);

test_case!(
    missing_column,
    input: "rows.discount",
    error: Code::UnknownProperty,
);

test_case!(
    projection_needs_records,
    input: "xs.value",
    error: Code::UnknownProperty,
);

test_case!(
    mutators_are_refused,
    input: "xs.push",
    error: Code::UnknownProperty,
);

test_case!(
    comparison_does_not_broadcast,
    input: "xs > 1",
    error: Code::TypeMismatch,
);

test_case!(
    filter_with_projection,
    input: "std.count(std.filter(rows, r => r.qty > 1))",
    value: num(2.0),
);

test_case!(
    arrays_are_not_comparable_for_equality,
    input: "xs == xs",
    error: Code::TypeMismatch,
);
