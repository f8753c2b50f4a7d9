#[macro_use]
mod cases;

use calcscript::Code;
use cases::num;

test_case!(
    integer_addition,
    input: "1 + 2",
    canonical: "(1 + 2)",
    value: num(3.0),
);

test_case!(
    multiplication_binds_tighter,
    input: "2 + 3 * 4",
    canonical: "(2 + (3 * 4))",
    value: num(14.0),
);

test_case!(
    subtraction_is_left_associative,
    input: "10 - 4 - 3",
    canonical: "((10 - 4) - 3)",
    value: num(3.0),
);

test_case!(
    power_is_right_associative,
    input: "2 ** 3 ** 2",
    canonical: "(2 ** (3 ** 2))",
    value: num(512.0),
);

test_case!(
    unary_minus_binds_tighter_than_power,
    input: "-2 ** 2",
    canonical: "((-2) ** 2)",
    value: num(4.0),
);

test_case!(
    parentheses_override_precedence,
    input: "(2 + 3) * 4",
    value: num(20.0),
);

test_case!(
    decimal_literals,
    input: "0.5 + 0.25",
    value: num(0.75),
);

test_case!(
    digit_separators,
    input: "1_000_000 / 1_000",
    value: num(1000.0),
);

test_case!(
    exponent_literals,
    input: "1.5e3 + 5E-1",
    value: num(1500.5),
);

test_case!(
    division_by_zero,
    input: "1 / 0",
    error: Code::DivisionByZero,
);

test_case!(
    zero_divided_by_zero,
    input: "0 / 0",
    error: Code::DivisionByZero,
);

test_case!(
    overflow_is_not_finite,
    input: "10 ** 400",
    error: Code::NonFinite,
);

test_case!(
    arithmetic_on_strings_is_a_type_error,
    input: "'a' * 2",
    error: Code::TypeMismatch,
);

test_case!(
    plus_does_not_concatenate,
    input: "'a' + 'b'",
    error: Code::TypeMismatch,
);

test_case!(
    leading_dot_is_not_a_number,
    input: ".5",
    error: Code::SyntaxError,
);

test_case!(
    negating_a_boolean,
    input: "-true",
    error: Code::TypeMismatch,
);
