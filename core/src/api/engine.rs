//! The CalcScript compilation and evaluation engine.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use hashbrown::HashSet;
use serde::Serialize;

use super::{
    CalcNode, Code, CompiledGraph, Declaration, Diagnostic, EngineOptions, EnvironmentBuilder,
    Error,
};
use crate::diagnostics::Location;
use crate::evaluator::{EvalError, Evaluator, Library};
use crate::scope::Scope;
use crate::values::Value;
use crate::{STDLIB_ROOT, analyzer, block, parser, scheduler};

/// The CalcScript engine.
///
/// The engine owns:
/// - The frozen standard-library root and its call whitelist
/// - The seeded environment (library root plus host inputs)
/// - Resource limits (EngineOptions)
///
/// # Example
///
/// ```
/// use calcscript_core::api::{Engine, EngineOptions};
/// use calcscript_core::stdlib::standard_library;
/// use calcscript_core::values::Value;
///
/// let engine = Engine::new(EngineOptions::default(), standard_library()?, |env| {
///     env.register("prices", Value::numbers([10.0, 20.0]))
/// })?;
///
/// let result = engine.evaluate_block(
///     "const total = std.sum(prices);\nconst taxed = total * 1.5;",
/// );
/// assert!(result.diagnostics.is_empty());
/// assert_eq!(result.value("taxed"), Some(&Value::Number(45.0)));
/// # Ok::<(), calcscript_core::api::Error>(())
/// ```
pub struct Engine {
    options: EngineOptions,
    library: Library,
    globals: Rc<Scope>,
}

impl Engine {
    /// Create a new engine.
    ///
    /// The library root is bound to `std`. The initialization closure
    /// registers host inputs through the [`EnvironmentBuilder`].
    pub fn new(
        options: EngineOptions,
        library: Library,
        init: impl FnOnce(&mut EnvironmentBuilder) -> Result<(), Error>,
    ) -> Result<Self, Error> {
        let mut env = EnvironmentBuilder::new();
        init(&mut env)?;

        let mut globals = Scope::root();
        globals.define(STDLIB_ROOT, library.root().clone());
        for (name, value) in env.build() {
            if !globals.define(name.as_str(), value) {
                return Err(Error::DuplicateName(name));
            }
        }
        tracing::debug!(globals = globals.len(), "engine created");

        Ok(Self {
            options,
            library,
            globals: Rc::new(globals),
        })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Parse, validate and schedule `declarations`.
    ///
    /// Never fails: every problem becomes a diagnostic. Declarations that
    /// fail to parse or validate stay in the graph as rejected nodes so
    /// that anything reading them reports an upstream error.
    pub fn compile(&self, declarations: &[Declaration]) -> CompiledGraph {
        let mut nodes = Vec::with_capacity(declarations.len());
        let mut diagnostics = Vec::new();
        let mut seen = HashSet::new();

        for decl in declarations {
            let node_name = Some(decl.name.as_str());
            if !seen.insert(decl.name.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        Code::DuplicateDeclaration,
                        format!("`{}` is already declared", decl.name),
                    )
                    .at(decl.line, Some(decl.column))
                    .on_node(node_name),
                );
                continue;
            }
            if self.globals.binds(&decl.name) {
                diagnostics.push(
                    Diagnostic::error(
                        Code::ReservedName,
                        format!("`{}` is already defined by the environment", decl.name),
                    )
                    .at(decl.line, Some(decl.column))
                    .on_node(node_name),
                );
                continue;
            }

            let mut node = CalcNode {
                name: decl.name.clone(),
                source: decl.source.clone(),
                line: decl.line,
                column: decl.column,
                expr: None,
                dependencies: BTreeSet::new(),
            };
            let origin = Location::new(decl.line, decl.column);
            match parser::parse(&decl.source) {
                Err(err) => {
                    let location = origin.advance(&decl.source, err.offset);
                    diagnostics.push(err.to_diagnostic(location, node_name));
                }
                Ok(expr) => {
                    let violations = analyzer::validate(&expr);
                    if violations.is_empty() {
                        node.dependencies = analyzer::free_identifiers(&expr);
                        node.expr = Some(expr);
                    } else {
                        diagnostics.extend(
                            violations
                                .iter()
                                .map(|v| v.to_diagnostic(origin, node_name)),
                        );
                    }
                }
            }
            if node.is_rejected() {
                tracing::debug!(node = %node.name, "declaration rejected");
            }
            nodes.push(node);
        }

        let schedule = scheduler::schedule(&nodes);
        if let Some(cycle) = &schedule.cycle {
            diagnostics.push(cycle.to_diagnostic());
        }
        tracing::debug!(
            nodes = nodes.len(),
            diagnostics = diagnostics.len(),
            "graph compiled"
        );

        CompiledGraph {
            nodes,
            schedule,
            diagnostics,
        }
    }

    /// Split the raw contents of one CalcScript block and compile it.
    ///
    /// `first_line` is the document line of the block's first line.
    pub fn compile_block(&self, text: &str, first_line: usize) -> CompiledGraph {
        let (declarations, mut diagnostics) = block::split(text, first_line);
        let mut graph = self.compile(&declarations);
        diagnostics.append(&mut graph.diagnostics);
        graph.diagnostics = diagnostics;
        graph
    }

    /// Evaluate every scheduled node of `graph`.
    pub fn run(&self, graph: &CompiledGraph) -> Evaluation {
        let mut session = self.session(graph);
        while session.step().is_some() {}
        session.finish()
    }

    /// Compile and run a block in one go. Never fails.
    pub fn evaluate_block(&self, text: &str) -> Evaluation {
        self.run(&self.compile_block(text, 1))
    }

    /// Start a run that the caller advances one node at a time.
    pub fn session<'s>(&'s self, graph: &'s CompiledGraph) -> Session<'s> {
        Session::new(self, graph)
    }
}

/// Values and diagnostics of one run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Evaluation {
    /// One entry per evaluated node; failed nodes hold an error sentinel.
    pub values: BTreeMap<String, Value>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Evaluation {
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Diagnostics attributed to `name`.
    pub fn diagnostics_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.node_name.as_deref() == Some(name))
    }
}

/// The outcome of evaluating one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<'s> {
    pub node: &'s CalcNode,
    /// The node's value, or its error sentinel.
    pub value: Value,
}

/// An in-progress run over a compiled graph.
///
/// Nodes are evaluated strictly in scheduled order against one environment
/// that gains exactly one binding per evaluated node. The host may stop
/// calling [`Session::step`] at any point; [`Session::finish`] returns what
/// has been evaluated so far.
pub struct Session<'s> {
    graph: &'s CompiledGraph,
    evaluator: Evaluator<'s>,
    scope: Rc<Scope>,
    cursor: usize,
    values: BTreeMap<String, Value>,
    diagnostics: Vec<Diagnostic>,
}

impl<'s> Session<'s> {
    fn new(engine: &'s Engine, graph: &'s CompiledGraph) -> Self {
        let mut scope = engine.globals.clone();
        for node in graph.nodes.iter().filter(|node| node.is_rejected()) {
            Rc::make_mut(&mut scope).define(
                node.name.as_str(),
                Value::error(node.name.as_str(), "declaration did not compile"),
            );
        }
        Self {
            graph,
            evaluator: Evaluator::new(&engine.library, engine.options),
            scope,
            cursor: 0,
            values: BTreeMap::new(),
            diagnostics: graph.diagnostics.clone(),
        }
    }

    /// Evaluate the next scheduled node. Returns `None` once every
    /// scheduled node has been evaluated.
    pub fn step(&mut self) -> Option<Step<'s>> {
        let graph = self.graph;
        let (node, expr) = loop {
            let &index = graph.schedule.order.get(self.cursor)?;
            self.cursor += 1;
            let node = &graph.nodes[index];
            if let Some(expr) = &node.expr {
                break (node, expr);
            }
        };

        let value = match self.evaluator.eval(expr, &self.scope) {
            Ok(value) => {
                tracing::trace!(node = %node.name, %value, "evaluated");
                value
            }
            Err(err) => {
                let failed = match &err {
                    EvalError::Upstream { node, .. } => node.clone(),
                    _ => node.name.clone(),
                };
                tracing::debug!(node = %node.name, code = %err.code(), error = %err, "evaluation failed");
                let location = Location::new(node.line, node.column);
                self.diagnostics.push(err.to_diagnostic(&node.name, location));
                Value::error(failed, err.to_string())
            }
        };

        Rc::make_mut(&mut self.scope).define(node.name.as_str(), value.clone());
        self.values.insert(node.name.clone(), value.clone());
        Some(Step { node, value })
    }

    /// Steps consumed so far.
    pub fn steps(&self) -> u64 {
        self.evaluator.steps()
    }

    pub fn finish(self) -> Evaluation {
        tracing::debug!(
            values = self.values.len(),
            diagnostics = self.diagnostics.len(),
            steps = self.evaluator.steps(),
            "run finished"
        );
        Evaluation {
            values: self.values,
            diagnostics: self.diagnostics,
        }
    }
}
