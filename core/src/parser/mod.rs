mod ast;
mod display;
pub mod error;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod token;
pub mod tokenizer;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub(crate) use display::write_quoted;
pub use error::{SyntaxError, SyntaxErrorKind};
pub use parser::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_HEIGHT, parse, parse_with_limits, parse_with_max_depth,
};
pub use token::{Operator, Punct, Token, TokenKind};
pub use tokenizer::{Mark, Tokenizer};


#[cfg(test)]
mod parse_test;
