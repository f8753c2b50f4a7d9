#[macro_use]
mod cases;

use calcscript::{Code, Value};
use cases::{num, text};

test_case!(
    library_call,
    input: "std.math.round(3.14159, 2)",
    canonical: "std.math.round(3.14159, 2)",
    value: num(3.14),
);

test_case!(
    aggregate_of_an_input,
    input: "std.mean(ys)",
    value: num(5.0),
);

test_case!(
    text_functions,
    input: "std.text.upper(name) & std.text.len(name)",
    value: text("ADA3"),
);

test_case!(
    date_arithmetic,
    input: "std.date.days_between(std.date.parse('2024-01-01'), today)",
    value: num(74.0),
);

test_case!(
    adding_days_crosses_months,
    input: "std.date.add_days(today, 17)",
    value: Value::date(2024, 4, 1).unwrap(),
);

test_case!(
    library_functions_are_values,
    input: "std.map(-xs, std.math.abs)",
    value: cases::nums([1.0, 2.0, 3.0]),
);

test_case!(
    calls_must_go_through_std,
    input: "sum(xs)",
    error: Code::UnsafeCall,
);

test_case!(
    aliased_library_function,
    input: "{ f: std.sum }.f(xs)",
    error: Code::UnsafeCall,
);

test_case!(
    calling_a_namespace,
    input: "std.math(1)",
    error: Code::UnsafeCall,
);

test_case!(
    calling_a_constant,
    input: "std.math.pi(1)",
    error: Code::UnsafeCall,
);

test_case!(
    unknown_library_function,
    input: "std.math.tan(1)",
    error: Code::UnsafeCall,
);

test_case!(
    calling_an_input,
    input: "config.rate(1)",
    error: Code::UnsafeCall,
);

test_case!(
    library_root_is_a_plain_value,
    input: "std.math.pi > 3.14",
    value: Value::Boolean(true),
);

test_case!(
    argument_type_errors,
    input: "std.sum(name)",
    error: Code::TypeMismatch,
);

test_case!(
    unknown_identifier,
    input: "undefined_thing + 1",
    error: Code::UnknownIdentifier,
);
