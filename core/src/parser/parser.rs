//! Recursive-descent parser, one function per precedence level.
//!
//! Lowest to highest: function literal, conditional, `||`, `&&`,
//! `== !=`, `< <= > >=`, `&`, `+ -`, `* /`, `**`, unary `- !`,
//! postfix `.name` / `(args)`, primary.
//!
//! Two limits keep every later pass off the end of the stack: the
//! parser's own recursion depth, and the height of the tree it builds.
//! Left-associative chains such as `1 + 1 + ... + 1` recurse little but
//! grow the tree by one level per operator, so they only hit the second.

use std::rc::Rc;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::{SyntaxError, SyntaxErrorKind};
use super::token::{Operator, Punct, TokenKind};
use super::tokenizer::Tokenizer;

/// Default limit on nested parentheses, calls, objects, conditionals,
/// function bodies and prefix operators.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default limit on the height of a parsed tree.
pub const DEFAULT_MAX_HEIGHT: usize = 128;

/// Parse one expression. Trailing input is an error.
pub fn parse(source: &str) -> Result<Expr, SyntaxError> {
    parse_with_limits(source, DEFAULT_MAX_DEPTH, DEFAULT_MAX_HEIGHT)
}

pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Expr, SyntaxError> {
    parse_with_limits(source, max_depth, DEFAULT_MAX_HEIGHT)
}

pub fn parse_with_limits(
    source: &str,
    max_depth: usize,
    max_height: usize,
) -> Result<Expr, SyntaxError> {
    let mut parser = Parser {
        tokens: Tokenizer::new(source)?,
        depth: 0,
        max_depth,
        max_height,
    };
    let node = parser.expression()?;
    let next = parser.tokens.peek();
    if next.kind != TokenKind::Eof {
        return Err(SyntaxError::new(
            SyntaxErrorKind::TrailingInput(next.kind.to_string()),
            next.offset,
        ));
    }
    Ok(node.expr)
}

/// An expression together with the height of its tree.
struct Node {
    expr: Expr,
    height: usize,
}

impl Node {
    fn leaf(expr: Expr) -> Self {
        Node { expr, height: 1 }
    }
}

type ParseResult = Result<Node, SyntaxError>;

struct Parser {
    tokens: Tokenizer,
    depth: usize,
    max_depth: usize,
    max_height: usize,
}

impl Parser {
    fn expression(&mut self) -> ParseResult {
        self.nested(|this| match this.function_params() {
            Some(params) => {
                let offset = this.tokens.peek().offset;
                let body = this.expression()?;
                this.build(
                    Expr::Function {
                        params,
                        body: Rc::new(body.expr),
                    },
                    body.height,
                    offset,
                )
            }
            None => this.conditional(),
        })
    }

    /// Try to read `x =>`, `() =>` or `(a, b) =>`. Rewinds and returns
    /// `None` when the input turns out to be something else.
    fn function_params(&mut self) -> Option<Vec<String>> {
        let mark = self.tokens.mark();
        let params = match self.tokens.next_token().kind {
            TokenKind::Ident(name) => Some(vec![name]),
            TokenKind::Punct(Punct::LParen) => self.param_list(),
            _ => None,
        };
        match params {
            Some(params) if self.tokens.eat(&TokenKind::Arrow) => Some(params),
            _ => {
                self.tokens.reset(mark);
                None
            }
        }
    }

    fn param_list(&mut self) -> Option<Vec<String>> {
        let mut params = Vec::new();
        if self.tokens.eat(&TokenKind::Punct(Punct::RParen)) {
            return Some(params);
        }
        loop {
            match self.tokens.next_token().kind {
                TokenKind::Ident(name) => params.push(name),
                _ => return None,
            }
            match self.tokens.next_token().kind {
                TokenKind::Punct(Punct::Comma) => continue,
                TokenKind::Punct(Punct::RParen) => return Some(params),
                _ => return None,
            }
        }
    }

    fn conditional(&mut self) -> ParseResult {
        let test = self.logical_or()?;
        let offset = self.tokens.peek().offset;
        if !self.tokens.eat(&TokenKind::Punct(Punct::Question)) {
            return Ok(test);
        }
        let consequent = self.expression()?;
        self.expect_punct(Punct::Colon)?;
        let alternate = self.expression()?;
        let height = test.height.max(consequent.height).max(alternate.height);
        self.build(
            Expr::Conditional {
                test: Box::new(test.expr),
                consequent: Box::new(consequent.expr),
                alternate: Box::new(alternate.expr),
            },
            height,
            offset,
        )
    }

    fn logical_or(&mut self) -> ParseResult {
        self.left_assoc(Self::logical_and, &[(Operator::Or, BinaryOp::Or)])
    }

    fn logical_and(&mut self) -> ParseResult {
        self.left_assoc(Self::equality, &[(Operator::And, BinaryOp::And)])
    }

    fn equality(&mut self) -> ParseResult {
        self.left_assoc(
            Self::comparison,
            &[(Operator::Eq, BinaryOp::Eq), (Operator::Ne, BinaryOp::Ne)],
        )
    }

    fn comparison(&mut self) -> ParseResult {
        self.left_assoc(
            Self::concatenation,
            &[
                (Operator::Lt, BinaryOp::Lt),
                (Operator::Le, BinaryOp::Le),
                (Operator::Gt, BinaryOp::Gt),
                (Operator::Ge, BinaryOp::Ge),
            ],
        )
    }

    fn concatenation(&mut self) -> ParseResult {
        self.left_assoc(Self::additive, &[(Operator::Amp, BinaryOp::Concat)])
    }

    fn additive(&mut self) -> ParseResult {
        self.left_assoc(
            Self::multiplicative,
            &[(Operator::Plus, BinaryOp::Add), (Operator::Minus, BinaryOp::Sub)],
        )
    }

    fn multiplicative(&mut self) -> ParseResult {
        self.left_assoc(
            Self::power,
            &[(Operator::Star, BinaryOp::Mul), (Operator::Slash, BinaryOp::Div)],
        )
    }

    fn power(&mut self) -> ParseResult {
        let base = self.unary()?;
        let offset = self.tokens.peek().offset;
        if self.tokens.eat(&TokenKind::Op(Operator::Pow)) {
            let exponent = self.nested(Self::power)?;
            return self.binary(BinaryOp::Pow, base, exponent, offset);
        }
        Ok(base)
    }

    fn unary(&mut self) -> ParseResult {
        let op = match self.tokens.peek().kind {
            TokenKind::Op(Operator::Minus) => UnaryOp::Neg,
            TokenKind::Op(Operator::Not) => UnaryOp::Not,
            _ => return self.postfix(),
        };
        let offset = self.tokens.next_token().offset;
        let operand = self.nested(Self::unary)?;
        self.build(Expr::unary(op, operand.expr), operand.height, offset)
    }

    fn postfix(&mut self) -> ParseResult {
        let mut node = self.primary()?;
        loop {
            let offset = self.tokens.peek().offset;
            if self.tokens.eat(&TokenKind::Punct(Punct::Dot)) {
                let token = self.tokens.next_token();
                let property = match token.kind {
                    TokenKind::Ident(property) => property,
                    other => return Err(unexpected("a property name", &other, token.offset)),
                };
                node = self.build(Expr::member(node.expr, property), node.height, offset)?;
            } else if self.tokens.eat(&TokenKind::Punct(Punct::LParen)) {
                let (args, args_height) = self.nested(Self::arguments)?;
                node = self.build(
                    Expr::Call {
                        callee: Box::new(node.expr),
                        args,
                    },
                    node.height.max(args_height),
                    offset,
                )?;
            } else {
                return Ok(node);
            }
        }
    }

    /// Call arguments after the opening `(`, with the tallest argument's height.
    fn arguments(&mut self) -> Result<(Vec<Expr>, usize), SyntaxError> {
        let mut args = Vec::new();
        let mut height = 0;
        if self.tokens.eat(&TokenKind::Punct(Punct::RParen)) {
            return Ok((args, height));
        }
        loop {
            let arg = self.expression()?;
            height = height.max(arg.height);
            args.push(arg.expr);
            if self.tokens.eat(&TokenKind::Punct(Punct::Comma)) {
                continue;
            }
            self.expect_punct(Punct::RParen)?;
            return Ok((args, height));
        }
    }

    fn primary(&mut self) -> ParseResult {
        let token = self.tokens.next_token();
        match token.kind {
            TokenKind::Number(n) => Ok(Node::leaf(Expr::Number(n))),
            TokenKind::Str(s) => Ok(Node::leaf(Expr::String(s))),
            TokenKind::Bool(b) => Ok(Node::leaf(Expr::Boolean(b))),
            TokenKind::Ident(name) => Ok(Node::leaf(Expr::Ident(name))),
            TokenKind::Punct(Punct::LBrace) => self.nested(|this| this.object(token.offset)),
            TokenKind::Punct(Punct::LParen) => {
                let inner = self.expression()?;
                self.expect_punct(Punct::RParen)?;
                Ok(inner)
            }
            other => Err(unexpected("an expression", &other, token.offset)),
        }
    }

    /// Object literal after the opening `{` found at `offset`.
    fn object(&mut self, offset: usize) -> ParseResult {
        let mut entries = Vec::new();
        let mut height = 0;
        loop {
            if self.tokens.eat(&TokenKind::Punct(Punct::RBrace)) {
                break;
            }
            let token = self.tokens.next_token();
            let (key, shorthand) = match token.kind {
                TokenKind::Ident(name) => (name, true),
                TokenKind::Str(s) => (s, false),
                other => return Err(unexpected("an object key", &other, token.offset)),
            };
            let value = if self.tokens.eat(&TokenKind::Punct(Punct::Colon)) {
                self.expression()?
            } else if shorthand {
                Node::leaf(Expr::Ident(key.clone()))
            } else {
                let next = self.tokens.peek();
                return Err(unexpected("`:`", &next.kind, next.offset));
            };
            height = height.max(value.height);
            entries.push((key, value.expr));

            if !self.tokens.eat(&TokenKind::Punct(Punct::Comma)) {
                self.expect_punct(Punct::RBrace)?;
                break;
            }
        }
        self.build(Expr::Object(entries), height, offset)
    }

    fn left_assoc(
        &mut self,
        operand: fn(&mut Self) -> ParseResult,
        ops: &[(Operator, BinaryOp)],
    ) -> ParseResult {
        let mut left = operand(self)?;
        'outer: loop {
            let offset = self.tokens.peek().offset;
            for (token_op, op) in ops {
                if self.tokens.eat(&TokenKind::Op(*token_op)) {
                    let right = operand(self)?;
                    left = self.binary(*op, left, right, offset)?;
                    continue 'outer;
                }
            }
            return Ok(left);
        }
    }

    fn binary(&self, op: BinaryOp, left: Node, right: Node, offset: usize) -> ParseResult {
        let height = left.height.max(right.height);
        self.build(Expr::binary(op, left.expr, right.expr), height, offset)
    }

    /// Wrap `expr` as a node one level above its tallest child.
    fn build(&self, expr: Expr, child_height: usize, offset: usize) -> ParseResult {
        let height = child_height + 1;
        if height > self.max_height {
            return Err(SyntaxError::new(
                SyntaxErrorKind::MaxHeightExceeded(self.max_height),
                offset,
            ));
        }
        Ok(Node { expr, height })
    }

    /// Run a recursive rule under the nesting limit.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= self.max_depth {
            return Err(SyntaxError::new(
                SyntaxErrorKind::MaxDepthExceeded(self.max_depth),
                self.tokens.peek().offset,
            ));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn expect_punct(&mut self, punct: Punct) -> Result<(), SyntaxError> {
        let token = self.tokens.next_token();
        if token.kind == TokenKind::Punct(punct) {
            Ok(())
        } else {
            Err(unexpected(
                &format!("`{}`", punct.as_char()),
                &token.kind,
                token.offset,
            ))
        }
    }
}

fn unexpected(expected: &str, found: &TokenKind, offset: usize) -> SyntaxError {
    SyntaxError::new(
        SyntaxErrorKind::Unexpected {
            expected: expected.to_string(),
            found: found.to_string(),
        },
        offset,
    )
}
