use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{
    BinaryOp, DEFAULT_MAX_HEIGHT, Expr, SyntaxErrorKind, UnaryOp, parse, parse_with_limits,
    parse_with_max_depth,
};

fn ast(source: &str) -> Expr {
    parse(source).unwrap_or_else(|e| panic!("Expression parsing failed: {source}\n{e}"))
}

fn num(n: f64) -> Expr {
    Expr::Number(n)
}

fn id(name: &str) -> Expr {
    Expr::ident(name)
}

#[test]
fn test_literals() {
    assert_eq!(ast("42"), num(42.0));
    assert_eq!(ast("\"hi\""), Expr::String("hi".into()));
    assert_eq!(ast("true"), Expr::Boolean(true));
    assert_eq!(ast("total"), id("total"));
}

#[test]
fn test_negative_number_is_unary() {
    assert_eq!(ast("-1"), Expr::unary(UnaryOp::Neg, num(1.0)));
}

#[test]
fn test_member_and_call_chain() {
    assert_eq!(
        ast("std.math.round(x, 2).value"),
        Expr::member(
            Expr::Call {
                callee: Box::new(Expr::member(Expr::member(id("std"), "math"), "round")),
                args: vec![id("x"), num(2.0)],
            },
            "value"
        )
    );
}

#[test]
fn test_empty_call() {
    assert_eq!(
        ast("std.now()"),
        Expr::Call {
            callee: Box::new(Expr::member(id("std"), "now")),
            args: vec![],
        }
    );
}

#[test]
fn test_function_literal_forms() {
    let single = Expr::Function {
        params: vec!["x".into()],
        body: Rc::new(Expr::binary(BinaryOp::Mul, id("x"), num(2.0))),
    };
    assert_eq!(ast("x => x * 2"), single);
    assert_eq!(ast("(x) => x * 2"), single);

    assert_eq!(
        ast("(a, b) => a + b"),
        Expr::Function {
            params: vec!["a".into(), "b".into()],
            body: Rc::new(Expr::binary(BinaryOp::Add, id("a"), id("b"))),
        }
    );
    assert_eq!(
        ast("() => 1"),
        Expr::Function {
            params: vec![],
            body: Rc::new(num(1.0)),
        }
    );
}

#[test]
fn test_function_literal_as_argument() {
    assert_eq!(
        ast("std.map(xs, x => x + 1)"),
        Expr::Call {
            callee: Box::new(Expr::member(id("std"), "map")),
            args: vec![
                id("xs"),
                Expr::Function {
                    params: vec!["x".into()],
                    body: Rc::new(Expr::binary(BinaryOp::Add, id("x"), num(1.0))),
                },
            ],
        }
    );
}

#[test]
fn test_parenthesized_identifier_is_not_a_function() {
    assert_eq!(ast("(a) + 1"), Expr::binary(BinaryOp::Add, id("a"), num(1.0)));
    assert!(parse("(a, b)").is_err());
}

#[test]
fn test_object_literal() {
    assert_eq!(
        ast("{ a: 1, \"b c\": x, d, }"),
        Expr::Object(vec![
            ("a".into(), num(1.0)),
            ("b c".into(), id("x")),
            ("d".into(), id("d")),
        ])
    );
    assert_eq!(ast("{}"), Expr::Object(vec![]));
}

#[test]
fn test_conditional() {
    assert_eq!(
        ast("a > 1 ? \"big\" : \"small\""),
        Expr::Conditional {
            test: Box::new(Expr::binary(BinaryOp::Gt, id("a"), num(1.0))),
            consequent: Box::new(Expr::String("big".into())),
            alternate: Box::new(Expr::String("small".into())),
        }
    );
}

#[test]
fn test_trailing_input_is_rejected() {
    let err = parse("a b").unwrap_err();
    assert_eq!(
        err.kind,
        SyntaxErrorKind::TrailingInput("identifier `b`".into())
    );
    assert_eq!(err.offset, 2);
}

#[test]
fn test_malformed_inputs() {
    for source in [
        "", "1 +", "(1", "{ a: }", "{ \"k\" }", "a.", "a.1", "f(1,", "a ? b", "=> 1", "1 + * 2",
    ] {
        assert!(parse(source).is_err(), "expected a syntax error for {source:?}");
    }
}

#[test]
fn test_error_positions() {
    let err = parse("1 + * 2").unwrap_err();
    assert_eq!(err.offset, 4);
    assert_eq!(
        err.kind,
        SyntaxErrorKind::Unexpected {
            expected: "an expression".into(),
            found: "`*`".into(),
        }
    );

    let err = parse("(1 + 2").unwrap_err();
    assert_eq!(err.offset, 6);
}

#[test]
fn test_max_depth() {
    let deep = format!("{}1{}", "(".repeat(50), ")".repeat(50));
    assert!(parse_with_max_depth(&deep, 100).is_ok());
    let err = parse_with_max_depth(&deep, 10).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::MaxDepthExceeded(10));

    let negations = format!("{}1", "-".repeat(500));
    assert!(matches!(
        parse(&negations).unwrap_err().kind,
        SyntaxErrorKind::MaxDepthExceeded(_)
    ));
}

#[test]
fn test_long_chains_are_bounded_by_tree_height() {
    let sum = |terms: usize| vec!["1"; terms].join(" + ");
    assert!(parse(&sum(DEFAULT_MAX_HEIGHT / 2)).is_ok());
    assert_eq!(
        parse(&sum(100_000)).unwrap_err().kind,
        SyntaxErrorKind::MaxHeightExceeded(DEFAULT_MAX_HEIGHT)
    );

    let members = format!("x{}", ".x".repeat(100_000));
    assert_eq!(
        parse(&members).unwrap_err().kind,
        SyntaxErrorKind::MaxHeightExceeded(DEFAULT_MAX_HEIGHT)
    );

    let calls = format!("std.f{}", "(1)".repeat(100_000));
    assert_eq!(
        parse(&calls).unwrap_err().kind,
        SyntaxErrorKind::MaxHeightExceeded(DEFAULT_MAX_HEIGHT)
    );
}

#[test]
fn test_height_counts_every_level() {
    // `a * b + c` is two levels of operators over leaves.
    assert!(parse_with_limits("a * b + c", 64, 3).is_ok());
    assert_eq!(
        parse_with_limits("a * b + c", 64, 2).unwrap_err().kind,
        SyntaxErrorKind::MaxHeightExceeded(2)
    );
    // Parentheses nest the parser, not the tree.
    assert!(parse_with_limits("((((a))))", 64, 1).is_ok());
    assert!(parse_with_limits("{ a: { b: 1 } }", 64, 3).is_ok());
    assert!(parse_with_limits("{ a: { b: 1 } }", 64, 2).is_err());
}

#[test]
fn test_deep_nesting_is_rejected_not_overflowed() {
    let parens = format!("{}1{}", "(".repeat(250), ")".repeat(250));
    assert!(matches!(
        parse(&parens).unwrap_err().kind,
        SyntaxErrorKind::MaxDepthExceeded(_)
    ));

    let objects = format!("{}1{}", "{a: ".repeat(250), "}".repeat(250));
    assert!(matches!(
        parse(&objects).unwrap_err().kind,
        SyntaxErrorKind::MaxDepthExceeded(_) | SyntaxErrorKind::MaxHeightExceeded(_)
    ));

    let args = format!("{}1{}", "std.f(".repeat(250), ")".repeat(250));
    assert!(parse(&args).is_err());
}

#[test]
fn test_canonical_text_round_trip() {
    for source in [
        "a + b * c - d / e",
        "-x ** 2",
        "!(a && b) || c",
        "rows.qty * rows.price",
        "std.text.join(names & \"!\", \", \")",
        "x > 0 ? x : y > 0 ? y : 0",
        "(a, b) => { sum: a + b, \"quoted key\": a.b(1)(2) }",
        "{ a, b: \"line\\nbreak\" }",
        "std.map(xs, x => x * 2)",
        "1.5 & \"tab\\t\"",
    ] {
        let first = ast(source);
        let canonical = first.to_string();
        let second = parse(&canonical)
            .unwrap_or_else(|e| panic!("canonical form failed to parse: {canonical}\n{e}"));
        assert_eq!(first, second, "round trip through {canonical}");
    }
}
