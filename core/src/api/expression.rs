//! Compiled declaration graphs.

use std::collections::BTreeSet;

use serde::Serialize;

use super::Diagnostic;
use crate::parser::Expr;
use crate::scheduler::Schedule;

/// One `const name = expr;` statement as handed over by a document
/// extractor or the block splitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    /// The expression text only, without `const name =` or `;`.
    pub source: String,
    /// Document line of the first character of `source`.
    pub line: usize,
    /// Document column of the first character of `source`.
    pub column: usize,
}

impl Declaration {
    pub fn new(name: impl Into<String>, source: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            line,
            column: 1,
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }
}

/// A declaration after parsing and static checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalcNode {
    pub name: String,
    #[serde(skip)]
    pub source: String,
    pub line: usize,
    #[serde(skip)]
    pub column: usize,
    /// `None` when the declaration failed to parse or validate. Such a node
    /// is never evaluated and has no dependencies.
    #[serde(skip)]
    pub expr: Option<Expr>,
    pub dependencies: BTreeSet<String>,
}

impl CalcNode {
    pub fn is_rejected(&self) -> bool {
        self.expr.is_none()
    }
}

/// The compiled form of a list of declarations.
///
/// A graph is immutable and can be run any number of times; every run
/// starts from the engine's seeded environment.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledGraph {
    pub(crate) nodes: Vec<CalcNode>,
    pub(crate) schedule: Schedule,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl CompiledGraph {
    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[CalcNode] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&CalcNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Node names in evaluation order. Nodes caught in a cycle are absent.
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.schedule
            .order
            .iter()
            .map(|&i| self.nodes[i].name.as_str())
    }

    /// Diagnostics from splitting, parsing, validation and scheduling.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}
