use thiserror::Error;

use crate::api::{Code, Diagnostic};
use crate::diagnostics::Location;

/// Tokenizer or parser failure at a byte offset of the expression source.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("unknown escape sequence `\\{0}`")]
    UnknownEscape(char),

    #[error("numeric literal `{0}` is not a finite number")]
    NonFiniteNumber(String),

    #[error("expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },

    #[error("unexpected {0} after the end of the expression")]
    TrailingInput(String),

    #[error("expression nesting exceeds the maximum of {0} levels")]
    MaxDepthExceeded(usize),

    #[error("expression tree is deeper than the maximum of {0} levels")]
    MaxHeightExceeded(usize),
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Convert to a diagnostic, mapping the offset through `location`.
    pub fn to_diagnostic(&self, location: Location, node: Option<&str>) -> Diagnostic {
        Diagnostic::error(Code::SyntaxError, self.to_string())
            .at(location.line, Some(location.column))
            .on_node(node)
    }
}
