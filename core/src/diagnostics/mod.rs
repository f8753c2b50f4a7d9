//! Mapping byte offsets back to document lines and columns.

use serde::Serialize;

/// 1-based line and column in the surrounding document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Location of byte `offset` inside `text`, where `text` itself starts
    /// at `self`. Columns count characters, not bytes.
    pub fn advance(self, text: &str, offset: usize) -> Location {
        let offset = offset.min(text.len());
        let before = text.get(..offset).unwrap_or(text);
        match before.rfind('\n') {
            Some(newline) => Location {
                line: self.line + before.matches('\n').count(),
                column: before[newline + 1..].chars().count() + 1,
            },
            None => Location {
                line: self.line,
                column: self.column + before.chars().count(),
            },
        }
    }
}
