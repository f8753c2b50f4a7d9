//! Evaluation order for a declaration graph.
//!
//! Edges only run between declared nodes; a dependency on anything else
//! (an input, a table, a typo) is left for the evaluator to resolve or
//! report. Ordering is Kahn's algorithm, always taking the earliest
//! declared ready node, so the order is a pure function of the graph.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use thiserror::Error;

use crate::api::{CalcNode, Code, Diagnostic};


/// Document-level failure: some nodes could not be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cycle or unresolved dependency among: {}", .unresolved.join(", "))]
pub struct CycleError {
    /// Names of the nodes left out of the order, in declaration order.
    pub unresolved: Vec<String>,
    /// Smallest source line among the unresolved nodes.
    pub line: usize,
}

impl CycleError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(Code::Cycle, self.to_string()).at(self.line, None)
    }
}

/// Result of scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    /// Indices into the node list, in evaluation order.
    pub order: Vec<usize>,
    pub cycle: Option<CycleError>,
}

impl Schedule {
    pub fn is_complete(&self) -> bool {
        self.cycle.is_none()
    }
}

pub fn schedule(nodes: &[CalcNode]) -> Schedule {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.name.as_str(), i))
        .collect();

    let mut indegree = vec![0usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        for dep in &node.dependencies {
            if let Some(&d) = index.get(dep.as_str()) {
                indegree[i] += 1;
                dependents[d].push(i);
            }
        }
    }

    let mut ready: BTreeSet<usize> = indegree
        .iter()
        .enumerate()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(i, _)| i)
        .collect();
    let mut order = Vec::with_capacity(nodes.len());
    while let Some(n) = ready.pop_first() {
        order.push(n);
        for &m in &dependents[n] {
            indegree[m] -= 1;
            if indegree[m] == 0 {
                ready.insert(m);
            }
        }
    }

    let cycle = (order.len() < nodes.len()).then(|| {
        let stuck: Vec<&CalcNode> = nodes
            .iter()
            .zip(&indegree)
            .filter(|&(_, &deg)| deg > 0)
            .map(|(node, _)| node)
            .collect();
        CycleError {
            unresolved: stuck.iter().map(|node| node.name.clone()).collect(),
            line: stuck.iter().map(|node| node.line).min().unwrap_or(1),
        }
    });
    if let Some(cycle) = &cycle {
        tracing::warn!(unresolved = ?cycle.unresolved, "dependency cycle");
    }
    tracing::debug!(ordered = order.len(), total = nodes.len(), "scheduled");

    Schedule { order, cycle }
}
