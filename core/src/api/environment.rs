//! Environment builder for seeding inputs and tables.

use super::Error;
use crate::evaluator::is_identifier;
use crate::values::Value;
use crate::{STDLIB_ROOT, is_banned_name};

/// Builder for the names every run starts with.
///
/// The library root is always bound to `std` by the engine itself; hosts
/// add inputs and tables here.
///
/// # Example
///
/// ```
/// use calcscript_core::api::{Engine, EngineOptions};
/// use calcscript_core::evaluator::Library;
/// use calcscript_core::values::Value;
///
/// let engine = Engine::new(EngineOptions::default(), Library::empty(), |env| {
///     env.register("rate", Value::Number(0.2))?;
///     Ok(())
/// })?;
/// # Ok::<(), calcscript_core::api::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct EnvironmentBuilder {
    entries: Vec<(String, Value)>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a global input value.
    ///
    /// Fails on `std`, on names that are not identifiers or are banned, and
    /// on names registered twice.
    pub fn register(&mut self, name: &str, value: Value) -> Result<(), Error> {
        if name == STDLIB_ROOT {
            return Err(Error::ReservedName(name.to_string()));
        }
        if !is_identifier(name) || is_banned_name(name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        if self.entries.iter().any(|(existing, _)| existing == name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        self.entries.push((name.to_string(), value));
        Ok(())
    }

    pub(crate) fn build(self) -> Vec<(String, Value)> {
        self.entries
    }
}
