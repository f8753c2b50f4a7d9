//! Tree-walking evaluator for CalcScript expressions.
//!
//! The evaluator interprets parsed expressions against a [`Scope`] and
//! produces runtime [`Value`]s.
//!
//! ## Design Principles
//!
//! - **Never panic**: every failure surfaces as an [`EvalError`]
//! - **Stack-safe**: depth tracking bounds recursion on deeply nested input
//! - **Bounded**: a step budget bounds total work, including broadcasting
//! - **Closed world**: calls only reach functions enumerated from the
//!   frozen [`Library`] root
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use calcscript_core::{api::EngineOptions, evaluator, parser, scope::Scope, values::Value};
//!
//! let library = evaluator::Library::empty();
//! let expr = parser::parse("1 + 2 * 3").unwrap();
//! let value = evaluator::eval(&library, EngineOptions::default(), &expr, &Rc::new(Scope::root()));
//! assert_eq!(value, Ok(Value::Number(7.0)));
//! ```
//!
//! [`Scope`]: crate::scope::Scope
//! [`Value`]: crate::values::Value

mod error;
mod eval;
mod library;
mod member;
mod operators;


pub use error::{EvalError, ResourceExceeded};
pub use eval::{CallContext, Evaluator};
pub use library::{Library, LibraryBuilder};
pub use member::ARRAY_MUTATORS;

pub(crate) use library::is_identifier;

use std::rc::Rc;

use crate::api::EngineOptions;
use crate::parser::Expr;
use crate::scope::Scope;
use crate::values::Value;

/// Evaluate a single expression with a fresh evaluator.
pub fn eval(
    library: &Library,
    options: EngineOptions,
    expr: &Expr,
    scope: &Rc<Scope>,
) -> Result<Value, EvalError> {
    Evaluator::new(library, options).eval(expr, scope)
}
