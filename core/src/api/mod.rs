//! Public API for the CalcScript declaration language.
//!
//! The pipeline is: split or receive [`Declaration`]s, [`Engine::compile`]
//! them into a [`CompiledGraph`] (parse, validate, extract dependencies,
//! schedule), then [`Engine::run`] the graph to get an [`Evaluation`].
//! Nothing in this pipeline fails as a whole; problems in user code are
//! reported as [`Diagnostic`]s with stable codes.
//!
//! # Example
//!
//! ```
//! use calcscript_core::api::{Code, Declaration, Engine, EngineOptions};
//! use calcscript_core::stdlib::standard_library;
//!
//! let engine = Engine::new(EngineOptions::default(), standard_library()?, |_| Ok(()))?;
//!
//! let graph = engine.compile(&[
//!     Declaration::new("a", "1 / 0", 1),
//!     Declaration::new("b", "a + 1", 2),
//! ]);
//! let result = engine.run(&graph);
//!
//! let codes: Vec<Code> = result.diagnostics.iter().map(|d| d.code).collect();
//! assert_eq!(codes, [Code::DivisionByZero, Code::UpstreamError]);
//! # Ok::<(), calcscript_core::api::Error>(())
//! ```

pub mod engine;
pub mod environment;
pub mod error;
pub mod expression;
pub mod options;

pub use engine::{Engine, Evaluation, Session, Step};
pub use environment::EnvironmentBuilder;
pub use error::{Code, Diagnostic, Error, Severity};
pub use expression::{CalcNode, CompiledGraph, Declaration};
pub use options::EngineOptions;
