use std::path::{Path, PathBuf};
use std::process::ExitCode;

use calcscript::{
    CompiledGraph, Engine, EngineOptions, Evaluation, Value, render_diagnostics, standard_library,
};
use clap::{Parser, Subcommand};
use miette::{Diagnostic, Result};
use thiserror::Error;

/// CalcScript - safe declaration blocks for computed values
#[derive(Parser, Debug)]
#[command(name = "calcscript-cli")]
#[command(about = "Evaluate CalcScript declaration blocks", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a file of `const name = expr;` declarations
    Eval {
        /// File holding the block text
        file: PathBuf,

        /// JSON object whose keys are bound as inputs
        #[arg(long, value_name = "FILE")]
        inputs: Option<PathBuf>,

        /// Print values and diagnostics as JSON
        #[arg(long)]
        json: bool,

        /// Document line of the block's first line
        #[arg(long, default_value_t = 1)]
        first_line: usize,

        /// Print the compiled graph (for debugging)
        #[arg(long)]
        debug_graph: bool,

        /// Maximum evaluation steps for the whole run
        #[arg(long)]
        max_steps: Option<u64>,
    },
}

#[derive(Debug, Error, Diagnostic)]
enum CliError {
    #[error("cannot read `{}`", .path.display())]
    #[diagnostic(code(calcscript::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("inputs file is not valid JSON")]
    #[diagnostic(code(calcscript::inputs))]
    InputsJson(#[source] serde_json::Error),

    #[error("inputs must be a JSON object of name/value pairs")]
    #[diagnostic(code(calcscript::inputs))]
    InputsShape,

    #[error("input `{name}` cannot be used: {reason}")]
    #[diagnostic(code(calcscript::inputs))]
    InvalidInput { name: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(calcscript::engine))]
    Engine(#[from] calcscript::Error),

    #[error("cannot serialize the evaluation")]
    #[diagnostic(code(calcscript::output))]
    Output(#[source] serde_json::Error),
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert one JSON input into a runtime value.
fn input_value(name: &str, json: &serde_json::Value) -> Result<Value, CliError> {
    let invalid = |reason: String| CliError::InvalidInput {
        name: name.to_string(),
        reason,
    };
    Ok(match json {
        serde_json::Value::Null => Value::Absent,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(n) if n.is_finite() => Value::Number(n),
            _ => return Err(invalid(format!("{n} is not a finite number"))),
        },
        serde_json::Value::String(s) => Value::string(s.as_str()),
        serde_json::Value::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(input_value(name, item)?);
            }
            Value::array(values)
        }
        serde_json::Value::Object(fields) => {
            let mut entries = Vec::with_capacity(fields.len());
            for (key, value) in fields {
                entries.push((key.as_str(), input_value(name, value)?));
            }
            Value::record(entries).map_err(|e| invalid(e.to_string()))?
        }
    })
}

fn load_inputs(path: Option<&Path>) -> Result<Vec<(String, Value)>, CliError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let json: serde_json::Value =
        serde_json::from_str(&read(path)?).map_err(CliError::InputsJson)?;
    let serde_json::Value::Object(fields) = json else {
        return Err(CliError::InputsShape);
    };
    let mut inputs = Vec::with_capacity(fields.len());
    for (name, value) in &fields {
        inputs.push((name.clone(), input_value(name, value)?));
    }
    Ok(inputs)
}

fn print_graph(graph: &CompiledGraph) {
    println!("=== Compiled graph ===");
    for node in graph.nodes() {
        let deps: Vec<&str> = node.dependencies.iter().map(String::as_str).collect();
        let status = if node.is_rejected() { " (rejected)" } else { "" };
        println!("{} [line {}] <- [{}]{status}", node.name, node.line, deps.join(", "));
    }
    println!("order: {}", graph.order().collect::<Vec<_>>().join(", "));
    println!();
}

fn print_values(graph: &CompiledGraph, evaluation: &Evaluation) {
    for node in graph.nodes() {
        if let Some(value) = evaluation.value(&node.name) {
            println!("{} = {value}", node.name);
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // CALCSCRIPT_LOG, then RUST_LOG, control the log level; default is warn.
    let filter = EnvFilter::try_from_env("CALCSCRIPT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let Command::Eval {
        file,
        inputs,
        json,
        first_line,
        debug_graph,
        max_steps,
    } = args.command;

    let source = read(&file)?;
    let inputs = load_inputs(inputs.as_deref())?;
    tracing::debug!(file = %file.display(), inputs = inputs.len(), "loaded");

    let mut options = EngineOptions::default();
    if let Some(max_steps) = max_steps {
        options.max_steps = max_steps;
    }
    let engine = Engine::new(
        options,
        standard_library().map_err(CliError::from)?,
        |env| {
            for (name, value) in inputs {
                env.register(&name, value)?;
            }
            Ok(())
        },
    )
    .map_err(CliError::from)?;

    let graph = engine.compile_block(&source, first_line);
    if debug_graph {
        print_graph(&graph);
    }
    let evaluation = engine.run(&graph);

    if json {
        let out = serde_json::to_string_pretty(&evaluation).map_err(CliError::Output)?;
        println!("{out}");
    } else {
        print_values(&graph, &evaluation);
        render_diagnostics(&source, first_line, &evaluation.diagnostics);
    }

    Ok(if evaluation.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
