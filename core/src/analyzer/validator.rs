//! Static safety checks over a parsed expression.

use hashbrown::HashSet;
use thiserror::Error;

use crate::api::{Code, Diagnostic};
use crate::diagnostics::Location;
use crate::parser::Expr;
use crate::{STDLIB_ROOT, is_banned_name};

/// A construct that is rejected before evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("access to member `{name}` is not allowed")]
    UnsafeMember { name: String },

    #[error("object key `{key}` is not allowed")]
    UnsafeKey { key: String },

    #[error("`std` cannot be used as a parameter name")]
    ReservedParameter,

    #[error("parameter `{name}` is declared more than once")]
    DuplicateParameter { name: String },
}

impl ValidationError {
    pub fn code(&self) -> Code {
        match self {
            ValidationError::UnsafeMember { .. } => Code::UnsafeMember,
            ValidationError::UnsafeKey { .. } => Code::UnsafeKey,
            ValidationError::ReservedParameter => Code::ReservedParameter,
            ValidationError::DuplicateParameter { .. } => Code::DuplicateParameter,
        }
    }

    pub fn to_diagnostic(&self, location: Location, node: Option<&str>) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string())
            .at(location.line, Some(location.column))
            .on_node(node)
    }
}

/// Every violation in `expr`, in source order. An empty result means the
/// expression may be evaluated.
pub fn validate(expr: &Expr) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    visit(expr, &mut errors);
    errors
}

fn visit(expr: &Expr, errors: &mut Vec<ValidationError>) {
    match expr {
        Expr::Number(_) | Expr::String(_) | Expr::Boolean(_) | Expr::Ident(_) => {}
        Expr::Unary { operand, .. } => visit(operand, errors),
        Expr::Binary { left, right, .. } => {
            visit(left, errors);
            visit(right, errors);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            visit(test, errors);
            visit(consequent, errors);
            visit(alternate, errors);
        }
        Expr::Member { object, property } => {
            visit(object, errors);
            if is_banned_name(property) {
                errors.push(ValidationError::UnsafeMember {
                    name: property.clone(),
                });
            }
        }
        Expr::Call { callee, args } => {
            visit(callee, errors);
            args.iter().for_each(|arg| visit(arg, errors));
        }
        Expr::Function { params, body } => {
            let mut seen = HashSet::new();
            for param in params {
                if param == STDLIB_ROOT {
                    errors.push(ValidationError::ReservedParameter);
                }
                if !seen.insert(param.as_str()) {
                    errors.push(ValidationError::DuplicateParameter {
                        name: param.clone(),
                    });
                }
            }
            visit(body, errors);
        }
        Expr::Object(fields) => {
            for (key, value) in fields {
                if is_banned_name(key) {
                    errors.push(ValidationError::UnsafeKey { key: key.clone() });
                }
                visit(value, errors);
            }
        }
    }
}
