//! CalcScript - a small, safe declaration language for computed values
//!
//! # Overview
//!
//! A CalcScript block is a list of `const name = expression;` declarations
//! embedded in a host document. Declarations may reference each other in any
//! order; the engine orders them by dependency and evaluates each one in a
//! closed, side-effect-free world. Common use cases include:
//!
//! - Derived figures in reports and notebooks
//! - Column arithmetic over tabular inputs
//! - Lightweight business rules
//!
//! # Quick Start
//!
//! ```
//! use calcscript::{Engine, EngineOptions, Value, standard_library};
//!
//! let engine = Engine::new(EngineOptions::default(), standard_library()?, |env| {
//!     env.register("prices", Value::numbers([10.0, 30.0]))
//! })?;
//!
//! let result = engine.evaluate_block(
//!     "const gross = net * 1.5;\nconst net = std.sum(prices);",
//! );
//! assert!(result.diagnostics.is_empty());
//! assert_eq!(result.value("gross"), Some(&Value::Number(60.0)));
//! # Ok::<(), calcscript::Error>(())
//! ```
//!
//! # Failures
//!
//! Nothing in the pipeline fails as a whole. Each problem becomes a
//! [`Diagnostic`] with a stable code; a node that fails to evaluate holds an
//! error sentinel, and every node reading it reports an upstream error that
//! names the node that failed first. Use [`render_diagnostics`] to print
//! diagnostics against the block source.

mod error_renderer;

pub use error_renderer::{
    render_diagnostics, render_diagnostics_to, render_diagnostics_to_string,
    render_diagnostics_to_string_no_color,
};

// Re-export public API from calcscript_core
pub use calcscript_core::api::{
    CalcNode, Code, CompiledGraph, Declaration, Diagnostic, Engine, EngineOptions,
    EnvironmentBuilder, Error, Evaluation, Session, Severity, Step,
};

// Re-export commonly used values and library types
pub use calcscript_core::evaluator::{CallContext, EvalError, Library, LibraryBuilder};
pub use calcscript_core::stdlib::standard_library;
pub use calcscript_core::values::{self, ErrorSentinel, NativeFn, NativeFunction, Value};
