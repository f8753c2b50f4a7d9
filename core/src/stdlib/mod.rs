//! CalcScript reference standard library
//!
//! Everything here hangs off the single root bound to `std`:
//! - `std.math`: numeric functions, element-wise over arrays
//! - `std.text`: string helpers
//! - `std.date`: date parsing and arithmetic
//! - `std.sum`, `std.mean`, `std.count`, `std.map`, `std.filter`,
//!   `std.range`: array helpers
//!
//! Every function is a native Rust function with the
//! [`NativeFn`](crate::values::NativeFn) signature. None of them touch I/O,
//! the clock or randomness. Hosts that want a different surface build their
//! own root with [`LibraryBuilder`] and can reuse the `register` function
//! of any package here.

use crate::api::Error;
use crate::evaluator::{Library, LibraryBuilder};

pub mod args;
pub mod array;
pub mod date;
pub mod math;
pub mod text;

#[cfg(test)]
mod stdlib_test;

/// Build the full reference library.
///
/// # Example
///
/// ```
/// use calcscript_core::stdlib::standard_library;
///
/// let library = standard_library()?;
/// assert!(library.len() > 10);
/// # Ok::<(), calcscript_core::api::Error>(())
/// ```
pub fn standard_library() -> Result<Library, Error> {
    let builder = LibraryBuilder::new();
    let builder = math::register(builder)?;
    let builder = text::register(builder)?;
    let builder = date::register(builder)?;
    let builder = array::register(builder)?;
    Ok(builder.build())
}
