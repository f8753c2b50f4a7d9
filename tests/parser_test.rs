#[macro_use]
mod cases;

use calcscript::Code;

test_case!(
    calls_and_members_chain,
    input: "std.math.max(rows.price, 1)",
    canonical: "std.math.max(rows.price, 1)",
);

test_case!(
    unary_operators_nest,
    input: "!!true",
    canonical: "(!(!true))",
);

test_case!(
    whitespace_is_insignificant,
    input: "  1\n  *\t2  ",
    canonical: "(1 * 2)",
);

test_case!(
    trailing_input,
    input: "1 2",
    error: Code::SyntaxError,
);

test_case!(
    unexpected_character,
    input: "1 # 2",
    error: Code::SyntaxError,
);

test_case!(
    dangling_operator,
    input: "1 +",
    error: Code::SyntaxError,
);

test_case!(
    unbalanced_parentheses,
    input: "(1 + 2",
    error: Code::SyntaxError,
);

test_case!(
    array_literals_are_not_supported,
    input: "[1, 2]",
    error: Code::SyntaxError,
);

test_case!(
    number_too_large,
    input: "1e999",
    error: Code::SyntaxError,
);

#[test]
fn nested_parentheses() {
    let source = format!("{}1{}", "(".repeat(40), ")".repeat(40));
    assert_eq!(cases::canonical(&source), Ok("1".to_string()));
    assert_eq!(cases::evaluate(&source), Ok(cases::num(1.0)));
}
