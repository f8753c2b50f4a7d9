//! Runtime evaluation errors.
//!
//! Every failure while evaluating a node is one of these. The scheduler
//! loop catches them per node, turns them into diagnostics and leaves an
//! error sentinel in the node's slot, so none of them ever escapes a run.
//!
//! # Error Categories
//!
//! - **Runtime errors**: arithmetic, lookup and type failures caused by the
//!   expression itself.
//!
//! - **Resource exceeded errors**: the depth or step budget ran out. These
//!   are reported like any other failure but carry their own code.

use thiserror::Error;

use crate::api::{Code, Diagnostic};
use crate::diagnostics::Location;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("non-finite number: {detail}")]
    NonFinite { detail: String },

    #[error("unknown identifier `{name}`")]
    UnknownIdentifier { name: String },

    #[error("property `{property}` is not allowed")]
    DisallowedProperty { property: String },

    #[error("{on} has no property `{property}`")]
    UnknownProperty { property: String, on: String },

    #[error("element {index} has no property `{property}`")]
    MissingColumn { property: String, index: usize },

    #[error("key `{key}` is not allowed")]
    DisallowedKey { key: String },

    #[error("unsafe call: {reason}")]
    UnsafeCall { reason: String },

    /// A read of a node whose evaluation failed. `node` names the node that
    /// failed first, which may be several hops upstream.
    #[error("depends on `{node}`, which failed")]
    Upstream { node: String, via: String },

    #[error("length mismatch in `{op}`: {left} vs {right}")]
    LengthMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },

    #[error("{context} expects {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    ResourceExceeded(#[from] ResourceExceeded),

    #[error("{0}")]
    Other(String),
}

/// Resource limit exceeded while evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceExceeded {
    #[error("evaluation depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },

    #[error("evaluation exceeded the budget of {max_steps} steps")]
    StepLimit { max_steps: u64 },
}

impl EvalError {
    pub fn type_mismatch(
        context: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        EvalError::TypeMismatch {
            context: context.into(),
            expected,
            found,
        }
    }

    pub fn non_finite(detail: impl Into<String>) -> Self {
        EvalError::NonFinite {
            detail: detail.into(),
        }
    }

    pub fn code(&self) -> Code {
        match self {
            EvalError::DivisionByZero => Code::DivisionByZero,
            EvalError::NonFinite { .. } => Code::NonFinite,
            EvalError::UnknownIdentifier { .. } => Code::UnknownIdentifier,
            EvalError::DisallowedProperty { .. }
            | EvalError::UnknownProperty { .. }
            | EvalError::MissingColumn { .. } => Code::UnknownProperty,
            EvalError::DisallowedKey { .. } => Code::DisallowedKey,
            EvalError::UnsafeCall { .. } => Code::UnsafeCall,
            EvalError::Upstream { .. } => Code::UpstreamError,
            EvalError::LengthMismatch { .. } => Code::LengthMismatch,
            EvalError::TypeMismatch { .. } => Code::TypeMismatch,
            EvalError::ResourceExceeded(_) => Code::ResourceLimit,
            EvalError::Other(_) => Code::EvalError,
        }
    }

    /// Diagnostic for `node`, pointing at the start of its expression.
    pub fn to_diagnostic(&self, node: &str, location: Location) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string())
            .at(location.line, Some(location.column))
            .on_node(Some(node))
    }
}
