//! Diagnostic rendering using ariadne
//!
//! Diagnostics carry document lines and columns; the renderer maps them back
//! onto the text of the block they came from and prints source snippets with
//! the diagnostic code and the declaration it concerns.

use std::io::Write;
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::{Diagnostic, Severity};

const SOURCE_ID: &str = "<block>";

/// Render diagnostics for a block to stderr.
///
/// `first_line` is the document line the block text starts on, the same
/// value passed to [`Engine::compile_block`](crate::Engine::compile_block).
///
/// # Example
/// ```no_run
/// use calcscript::{Engine, EngineOptions, render_diagnostics, standard_library};
///
/// let engine = Engine::new(EngineOptions::default(), standard_library()?, |_| Ok(()))?;
/// let source = "const a = 1 / 0;";
/// let result = engine.evaluate_block(source);
/// render_diagnostics(source, 1, &result.diagnostics);
/// # Ok::<(), calcscript::Error>(())
/// ```
pub fn render_diagnostics(source: &str, first_line: usize, diagnostics: &[Diagnostic]) {
    render_to_writer(source, first_line, diagnostics, &mut std::io::stderr(), true).ok();
}

/// Render diagnostics to a specific writer, with colors.
pub fn render_diagnostics_to(
    source: &str,
    first_line: usize,
    diagnostics: &[Diagnostic],
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    render_to_writer(source, first_line, diagnostics, writer, true)
}

/// Render diagnostics to a String (useful for web UIs and logs).
pub fn render_diagnostics_to_string(
    source: &str,
    first_line: usize,
    diagnostics: &[Diagnostic],
) -> String {
    let mut buf = Vec::new();
    render_to_writer(source, first_line, diagnostics, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Same as [`render_diagnostics_to_string`] without ANSI color codes.
pub fn render_diagnostics_to_string_no_color(
    source: &str,
    first_line: usize,
    diagnostics: &[Diagnostic],
) -> String {
    let mut buf = Vec::new();
    render_to_writer(source, first_line, diagnostics, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_to_writer(
    source: &str,
    first_line: usize,
    diagnostics: &[Diagnostic],
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    for diag in diagnostics {
        let (kind, color) = match diag.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
        };
        let span = span_of(source, first_line, diag);

        let mut report = Report::build(kind, (SOURCE_ID, span.clone()))
            .with_code(diag.code)
            .with_message(&diag.message)
            .with_config(ariadne::Config::default().with_color(use_color))
            .with_label(
                Label::new((SOURCE_ID, span))
                    .with_message(&diag.message)
                    .with_color(color),
            );
        if let Some(node) = &diag.node_name {
            report = report.with_note(format!("in the declaration of `{node}`"));
        }

        report
            .finish()
            .write((SOURCE_ID, Source::from(source)), &mut *writer)?;
    }

    Ok(())
}

/// Character range of a diagnostic inside the block text. A diagnostic
/// without a column covers its whole line; positions past the end clamp to
/// the end of the text.
fn span_of(source: &str, first_line: usize, diag: &Diagnostic) -> Range<usize> {
    let row = diag.line.saturating_sub(first_line);
    let mut offset = 0;
    for (i, line) in source.split('\n').enumerate() {
        let len = line.chars().count();
        if i == row {
            return match diag.column {
                Some(column) => {
                    let start = offset + column.saturating_sub(1).min(len);
                    start..(start + 1).min(offset + len).max(start)
                }
                None => offset..offset + len,
            };
        }
        offset += len + 1;
    }
    let end = source.chars().count();
    end..end
}
