//! Splitting a CalcScript block into declarations.
//!
//! A block is a sequence of `const <name> = <expr>;` statements. The
//! splitter only finds statement boundaries; expressions are handed to the
//! parser untouched. A `;` inside a string literal or a comment does not
//! end a statement.

use std::ops::Range;

use hashbrown::HashSet;
use logos::Logos;

use crate::api::{Code, Declaration, Diagnostic};
use crate::diagnostics::Location;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Piece {
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    BlockComment,

    #[token("const")]
    Const,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("=")]
    Assign,

    #[token(";")]
    Semi,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    Str,

    // Two-character operators, so that `==` and `=>` never read as `=`.
    #[token("==")]
    #[token("=>")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    Operator,

    #[regex(r#"[^ \t\r\n\f;'"A-Za-z_=]"#)]
    Other,
}

/// Declarations found in `text`, plus diagnostics for malformed or
/// repeated statements. `first_line` is the document line of the block's
/// first line.
pub fn split(text: &str, first_line: usize) -> (Vec<Declaration>, Vec<Diagnostic>) {
    let pieces: Vec<(Option<Piece>, Range<usize>)> = Piece::lexer(text)
        .spanned()
        .map(|(piece, span)| (piece.ok(), span))
        .collect();
    let mut splitter = Splitter {
        text,
        origin: Location::new(first_line, 1),
        pieces,
        pos: 0,
        declarations: Vec::new(),
        diagnostics: Vec::new(),
    };
    splitter.run();
    tracing::debug!(
        declarations = splitter.declarations.len(),
        diagnostics = splitter.diagnostics.len(),
        "block split"
    );
    (splitter.declarations, splitter.diagnostics)
}

struct Splitter<'t> {
    text: &'t str,
    origin: Location,
    pieces: Vec<(Option<Piece>, Range<usize>)>,
    pos: usize,
    declarations: Vec<Declaration>,
    diagnostics: Vec<Diagnostic>,
}

impl Splitter<'_> {
    fn run(&mut self) {
        let mut seen = HashSet::new();
        while self.pos < self.pieces.len() {
            if let Some(decl) = self.statement() {
                if seen.insert(decl.name.clone()) {
                    self.declarations.push(decl);
                } else {
                    let message = format!("`{}` is already declared", decl.name);
                    self.diagnostics.push(
                        Diagnostic::error(Code::DuplicateDeclaration, message)
                            .at(decl.line, Some(decl.column))
                            .on_node(Some(decl.name.as_str())),
                    );
                }
            }
        }
    }

    fn peek(&self) -> Option<(Option<Piece>, Range<usize>)> {
        self.pieces.get(self.pos).cloned()
    }

    fn location(&self, offset: usize) -> Location {
        self.origin.advance(self.text, offset)
    }

    /// Report at the current piece and skip past the next `;`.
    fn fail(&mut self, message: String, node: Option<&str>) -> Option<Declaration> {
        let offset = self
            .peek()
            .map_or(self.text.len(), |(_, span)| span.start);
        let at = self.location(offset);
        self.diagnostics.push(
            Diagnostic::error(Code::SyntaxError, message)
                .at(at.line, Some(at.column))
                .on_node(node),
        );
        while let Some((piece, _)) = self.peek() {
            self.pos += 1;
            if piece == Some(Piece::Semi) {
                break;
            }
        }
        None
    }

    fn statement(&mut self) -> Option<Declaration> {
        match self.peek() {
            Some((Some(Piece::Const), _)) => self.pos += 1,
            _ => return self.fail("expected `const`".to_string(), None),
        }

        let name = match self.peek() {
            Some((Some(Piece::Ident), span)) => {
                self.pos += 1;
                self.text[span].to_string()
            }
            _ => return self.fail("expected a name after `const`".to_string(), None),
        };

        match self.peek() {
            Some((Some(Piece::Assign), _)) => self.pos += 1,
            _ => return self.fail(format!("expected `=` after `{name}`"), Some(name.as_str())),
        }

        let start = match self.peek() {
            Some((Some(Piece::Semi), _)) | None => {
                return self.fail(format!("missing expression for `{name}`"), Some(name.as_str()));
            }
            Some((_, span)) => span.start,
        };
        let mut end = start;
        loop {
            match self.peek() {
                Some((Some(Piece::Semi), _)) => {
                    self.pos += 1;
                    break;
                }
                Some((_, span)) => {
                    end = span.end;
                    self.pos += 1;
                }
                None => {
                    return self.fail(format!("missing `;` after `{name}`"), Some(name.as_str()));
                }
            }
        }

        let at = self.location(start);
        Some(Declaration {
            name,
            source: self.text[start..end].to_string(),
            line: at.line,
            column: at.column,
        })
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn names(decls: &[Declaration]) -> Vec<&str> {
        decls.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn splits_statements_with_positions() {
        let text = indoc! {"
            const a = 1 + 2;
            // comment
            const total =
              a * 3;
        "};
        let (decls, diagnostics) = split(text, 10);
        assert_eq!(diagnostics, vec![]);
        assert_eq!(
            decls,
            vec![
                Declaration {
                    name: "a".to_string(),
                    source: "1 + 2".to_string(),
                    line: 10,
                    column: 11,
                },
                Declaration {
                    name: "total".to_string(),
                    source: "a * 3".to_string(),
                    line: 13,
                    column: 3,
                },
            ]
        );
    }

    #[test]
    fn semicolons_in_strings_and_comments_do_not_split() {
        let text = "const s = 'a;b' & /* ; */ \"c;\";";
        let (decls, diagnostics) = split(text, 1);
        assert!(diagnostics.is_empty());
        assert_eq!(decls[0].source, "'a;b' & /* ; */ \"c;\"");
    }

    #[test]
    fn equality_and_arrows_stay_in_the_expression() {
        let (decls, diagnostics) = split("const f = x => x == 1;", 1);
        assert!(diagnostics.is_empty());
        assert_eq!(decls[0].source, "x => x == 1");
    }

    #[test]
    fn duplicate_names_keep_the_first() {
        let (decls, diagnostics) = split("const a = 1;\nconst a = 2;", 1);
        assert_eq!(names(&decls), vec!["a"]);
        assert_eq!(decls[0].source, "1");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Code::DuplicateDeclaration);
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn malformed_statements_are_reported_and_skipped() {
        let text = indoc! {"
            let a = 1;
            const = 2;
            const b 3;
            const c = ;
            const d = 4;
        "};
        let (decls, diagnostics) = split(text, 1);
        assert_eq!(names(&decls), vec!["d"]);
        let lines: Vec<usize> = diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
        assert!(diagnostics.iter().all(|d| d.code == Code::SyntaxError));
        assert_eq!(diagnostics[2].node_name.as_deref(), Some("b"));
    }

    #[test]
    fn missing_semicolon() {
        let (decls, diagnostics) = split("const a = 1 + 2", 1);
        assert!(decls.is_empty());
        assert_eq!(diagnostics[0].message, "missing `;` after `a`");
    }

    #[test]
    fn empty_block() {
        let (decls, diagnostics) = split("  // nothing here\n", 1);
        assert!(decls.is_empty());
        assert!(diagnostics.is_empty());
    }
}
