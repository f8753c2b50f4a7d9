#[macro_use]
mod cases;

use calcscript::Code;
use cases::num;
use indoc::indoc;

test_case!(
    line_comment,
    input: "1 + 2 // three",
    canonical: "(1 + 2)",
    value: num(3.0),
);

test_case!(
    block_comment,
    input: "1 /* plus */ + /* two */ 2",
    value: num(3.0),
);

test_case!(
    comment_between_lines,
    input: "1 +\n// continued\n2",
    value: num(3.0),
);

test_case!(
    comment_markers_inside_strings,
    input: "'// not a comment' & '/* nor this */'",
    value: cases::text("// not a comment/* nor this */"),
);

test_case!(
    unterminated_block_comment,
    input: "1 /* never closed",
    error: Code::SyntaxError,
);

test_case!(
    multi_line_expression_with_comments,
    input: indoc! {"
        /* subtotal */ 10
          // then tax
          * 1.5
    "},
    value: num(15.0),
);
