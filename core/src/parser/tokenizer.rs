//! Turns expression source into a position-tagged token buffer.

use logos::Logos;

use super::error::{SyntaxError, SyntaxErrorKind};
use super::token::{Lexeme, Operator, Punct, Token, TokenKind};

/// Saved tokenizer position, see [`Tokenizer::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Token stream with single-token lookahead and mark/reset backtracking.
///
/// The whole source is lexed up front, so lexical errors surface from
/// [`Tokenizer::new`] before the parser sees any token.
#[derive(Debug)]
pub struct Tokenizer {
    tokens: Vec<Token>,
    pos: usize,
}

impl Tokenizer {
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        let mut tokens = Vec::new();
        let mut lexer = Lexeme::lexer(source);

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let slice = lexer.slice();
            let lexeme = match result {
                Ok(lexeme) => lexeme,
                Err(()) => return Err(lex_error(source, span.start)),
            };
            let kind = match lexeme {
                Lexeme::Number => TokenKind::Number(decode_number(slice, span.start)?),
                Lexeme::Str => TokenKind::Str(decode_string(slice, span.start)?),
                Lexeme::True => TokenKind::Bool(true),
                Lexeme::False => TokenKind::Bool(false),
                Lexeme::Ident => TokenKind::Ident(slice.to_string()),
                Lexeme::Arrow => TokenKind::Arrow,
                Lexeme::Plus => TokenKind::Op(Operator::Plus),
                Lexeme::Minus => TokenKind::Op(Operator::Minus),
                Lexeme::Star => TokenKind::Op(Operator::Star),
                Lexeme::StarStar => TokenKind::Op(Operator::Pow),
                Lexeme::Slash => {
                    // A `/*` that the block comment rule rejected never closes.
                    if source[span.end..].starts_with('*') {
                        return Err(SyntaxError::new(
                            SyntaxErrorKind::UnterminatedComment,
                            span.start,
                        ));
                    }
                    TokenKind::Op(Operator::Slash)
                }
                Lexeme::Amp => TokenKind::Op(Operator::Amp),
                Lexeme::EqEq => TokenKind::Op(Operator::Eq),
                Lexeme::BangEq => TokenKind::Op(Operator::Ne),
                Lexeme::Lt => TokenKind::Op(Operator::Lt),
                Lexeme::Le => TokenKind::Op(Operator::Le),
                Lexeme::Gt => TokenKind::Op(Operator::Gt),
                Lexeme::Ge => TokenKind::Op(Operator::Ge),
                Lexeme::AmpAmp => TokenKind::Op(Operator::And),
                Lexeme::PipePipe => TokenKind::Op(Operator::Or),
                Lexeme::Bang => TokenKind::Op(Operator::Not),
                Lexeme::LParen => TokenKind::Punct(Punct::LParen),
                Lexeme::RParen => TokenKind::Punct(Punct::RParen),
                Lexeme::Dot => TokenKind::Punct(Punct::Dot),
                Lexeme::Comma => TokenKind::Punct(Punct::Comma),
                Lexeme::LBrace => TokenKind::Punct(Punct::LBrace),
                Lexeme::RBrace => TokenKind::Punct(Punct::RBrace),
                Lexeme::Colon => TokenKind::Punct(Punct::Colon),
                Lexeme::Question => TokenKind::Punct(Punct::Question),
                Lexeme::LineComment | Lexeme::BlockComment => continue,
            };
            tokens.push(Token {
                kind,
                offset: span.start,
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            offset: source.len(),
        });
        Ok(Self { tokens, pos: 0 })
    }

    /// The next token, without consuming it.
    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Consume and return the next token. Keeps returning `Eof` at the end.
    pub fn next_token(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume the next token if it is `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }
}

fn lex_error(source: &str, offset: usize) -> SyntaxError {
    let rest = &source[offset..];
    if rest.starts_with("/*") {
        return SyntaxError::new(SyntaxErrorKind::UnterminatedComment, offset);
    }
    let kind = match rest.chars().next() {
        Some('"') | Some('\'') => SyntaxErrorKind::UnterminatedString,
        Some(c) => SyntaxErrorKind::UnexpectedChar(c),
        None => SyntaxErrorKind::Unexpected {
            expected: "a token".to_string(),
            found: "end of input".to_string(),
        },
    };
    SyntaxError::new(kind, offset)
}

fn decode_number(slice: &str, offset: usize) -> Result<f64, SyntaxError> {
    let digits: String = slice.chars().filter(|c| *c != '_').collect();
    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SyntaxError::new(
            SyntaxErrorKind::NonFiniteNumber(slice.to_string()),
            offset,
        )),
    }
}

fn decode_string(slice: &str, offset: usize) -> Result<String, SyntaxError> {
    // Strip the surrounding quotes; the lexeme regex guarantees both exist.
    let body = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnterminatedString,
                offset,
            ));
        };
        out.push(match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            other => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UnknownEscape(other),
                    offset + 1 + i,
                ));
            }
        });
    }
    Ok(out)
}
