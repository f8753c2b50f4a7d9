//! Public error types for the CalcScript API.
//!
//! Stage-specific errors (syntax, validation, graph, evaluation) are
//! converted into [`Diagnostic`]s at the API boundary. Diagnostic codes are
//! a stable contract with external tooling.

use core::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors from misusing the host API, as opposed to problems in user code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("`{0}` is reserved for the standard library")]
    ReservedName(String),

    #[error("`{0}` is already registered")]
    DuplicateName(String),

    #[error("`{0}` is not a valid identifier")]
    InvalidName(String),

    #[error("library path `{0}` conflicts with an existing entry")]
    LibraryPathConflict(String),
}

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    SyntaxError,
    DuplicateDeclaration,
    ReservedName,
    UnsafeMember,
    UnsafeKey,
    ReservedParameter,
    DuplicateParameter,
    Cycle,
    DivisionByZero,
    NonFinite,
    UnknownIdentifier,
    UnknownProperty,
    DisallowedKey,
    UnsafeCall,
    UpstreamError,
    LengthMismatch,
    TypeMismatch,
    ResourceLimit,
    EvalError,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Code::SyntaxError => "CALC_SYNTAX_ERROR",
            Code::DuplicateDeclaration => "CALC_DUPLICATE_DECLARATION",
            Code::ReservedName => "CALC_RESERVED_NAME",
            Code::UnsafeMember => "CALC_UNSAFE_MEMBER",
            Code::UnsafeKey => "CALC_UNSAFE_KEY",
            Code::ReservedParameter => "CALC_RESERVED_PARAMETER",
            Code::DuplicateParameter => "CALC_DUPLICATE_PARAMETER",
            Code::Cycle => "CALC_CYCLE",
            Code::DivisionByZero => "CALC_DIVISION_BY_ZERO",
            Code::NonFinite => "CALC_NON_FINITE",
            Code::UnknownIdentifier => "CALC_UNKNOWN_IDENTIFIER",
            Code::UnknownProperty => "CALC_UNKNOWN_PROPERTY",
            Code::DisallowedKey => "CALC_DISALLOWED_KEY",
            Code::UnsafeCall => "CALC_UNSAFE_CALL",
            Code::UpstreamError => "CALC_UPSTREAM_ERROR",
            Code::LengthMismatch => "CALC_LENGTH_MISMATCH",
            Code::TypeMismatch => "CALC_TYPE_MISMATCH",
            Code::ResourceLimit => "CALC_RESOURCE_LIMIT",
            Code::EvalError => "CALC_EVAL_ERROR",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message attributed to a document position and, when it
/// concerns a single declaration, to that declaration's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Code,
    pub message: String,
    /// 1-based line in the surrounding document.
    pub line: usize,
    /// 1-based column, when the position is known more precisely than a line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
}

impl Diagnostic {
    pub fn error(code: Code, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            line: 1,
            column: None,
            node_name: None,
        }
    }

    pub fn warning(code: Code, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message)
        }
    }

    pub fn at(mut self, line: usize, column: Option<usize>) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn on_node(mut self, node: Option<&str>) -> Self {
        self.node_name = node.map(str::to_string);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.severity, self.code)?;
        match self.column {
            Some(column) => write!(f, " {}:{}", self.line, column)?,
            None => write!(f, " {}", self.line)?,
        }
        if let Some(node) = &self.node_name {
            write!(f, " `{node}`")?;
        }
        write!(f, ": {}", self.message)
    }
}
