//! CalcScript core: tokenizer, parser, static checks, scheduler and
//! evaluator for `const name = expr;` declaration graphs.
//!
//! Most hosts go through [`api::Engine`]; the stage modules are public so
//! tooling can drive them one at a time.

pub mod analyzer;
pub mod api;
pub mod block;
pub mod diagnostics;
pub mod evaluator;
pub mod parser;
pub mod scheduler;
pub mod scope;
pub mod stdlib;
pub mod values;

/// Identifier naming the standard-library root in every environment.
pub const STDLIB_ROOT: &str = "std";

/// Property and key names that no value may ever expose.
pub const BANNED_NAMES: [&str; 3] = ["__proto__", "prototype", "constructor"];

/// Whether `name` is one of [`BANNED_NAMES`].
pub fn is_banned_name(name: &str) -> bool {
    BANNED_NAMES.contains(&name)
}
