//! Canonical text form of an expression.
//!
//! Every compound node is fully parenthesized so the output re-parses to
//! the same tree regardless of precedence.

use core::fmt::{self, Display, Formatter, Write};

use super::ast::Expr;

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::String(s) => write_quoted(f, s),
            Expr::Boolean(b) => write!(f, "{b}"),
            Expr::Ident(name) => f.write_str(name),
            Expr::Unary { op, operand } => write!(f, "({}{})", op.symbol(), operand),
            Expr::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => write!(f, "({test} ? {consequent} : {alternate})"),
            Expr::Member { object, property } => write!(f, "{object}.{property}"),
            Expr::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_separated(f, args.iter())?;
                f.write_char(')')
            }
            Expr::Function { params, body } => {
                write!(f, "(({}) => {})", params.join(", "), body)
            }
            Expr::Object(entries) => {
                if entries.is_empty() {
                    return f.write_str("{}");
                }
                f.write_char('{')?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ": {value}")?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_separated<'a>(
    f: &mut Formatter<'_>,
    items: impl Iterator<Item = &'a Expr>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

pub(crate) fn write_quoted(f: &mut impl Write, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\0' => f.write_str("\\0")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
