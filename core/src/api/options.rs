//! Configuration options for the CalcScript engine.

/// Resource limits applied while evaluating a graph.
///
/// # Example
///
/// ```
/// use calcscript_core::api::EngineOptions;
///
/// let options = EngineOptions {
///     max_depth: 100,
///     ..EngineOptions::default()
/// };
/// assert_eq!(options.max_steps, 1_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Maximum evaluation depth, counting nested expressions and calls.
    ///
    /// Default: 256
    pub max_depth: usize,

    /// Maximum number of evaluation steps for one run, shared by every node.
    ///
    /// Default: 1_000_000
    pub max_steps: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_steps: 1_000_000,
        }
    }
}
