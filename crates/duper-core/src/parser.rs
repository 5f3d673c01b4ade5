//! Recursive-descent parser: token stream → [`DuperValue`] tree.
//!
//! Grammar:
//!
//! ```text
//! value  := scalar | list | map | tagged
//! scalar := "null" | "true" | "false" | number | string
//! list   := "[" (value ("," value)*)? ","? "]"
//! map    := "{" (pair ("," pair)*)? ","? "}"
//! pair   := key ":" value
//! key    := identifier | string
//! tagged := identifier "(" (map | list | scalar) ")"
//! ```
//!
//! Trailing commas are permitted in lists and maps. A document is exactly
//! one value; anything after it is a parse error. An identifier immediately
//! followed by `(` is always a tagged value — Duper has no expression
//! syntax, so there is no ambiguity to resolve.

use crate::error::{DuperError, Position, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::types::DuperValue;

/// Parse a complete Duper document into a value tree.
///
/// Consumes the whole input: trailing content after the first value is a
/// [`DuperError::Parse`]. Lex errors from the underlying tokenizer pass
/// through unchanged, so the caller sees the first failure in pipeline
/// order.
pub fn parse(input: &str) -> Result<DuperValue> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    parser.expect_end()?;
    Ok(value)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<Option<Token<'a>>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            lookahead: None,
        }
    }

    fn peek(&mut self) -> Result<Option<&Token<'a>>> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lexer.next_token()?);
        }
        match &self.lookahead {
            Some(token) => Ok(token.as_ref()),
            None => Ok(None),
        }
    }

    fn advance(&mut self) -> Result<Option<Token<'a>>> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    /// Position for end-of-input errors: wherever the lexer stopped.
    fn eof_position(&self) -> Position {
        self.lexer.position()
    }

    fn unexpected(&self, position: Position, expected: &str, found: String) -> DuperError {
        DuperError::Parse {
            position,
            expected: expected.to_string(),
            found,
        }
    }

    fn unexpected_token(&self, token: &Token<'a>, expected: &str) -> DuperError {
        self.unexpected(token.position, expected, token.kind.describe())
    }

    fn unexpected_end(&self, expected: &str) -> DuperError {
        self.unexpected(self.eof_position(), expected, "end of input".to_string())
    }

    fn parse_value(&mut self) -> Result<DuperValue> {
        let Some(Token { kind, position }) = self.advance()? else {
            return Err(self.unexpected_end("a value"));
        };
        match kind {
            TokenKind::LBrace => self.parse_map(),
            TokenKind::LBracket => self.parse_list(),
            TokenKind::Str(s) => Ok(DuperValue::String(s)),
            TokenKind::Integer(i) => Ok(DuperValue::Integer(i)),
            TokenKind::Float(f) => Ok(DuperValue::Float(f)),
            TokenKind::Identifier(name) => {
                // Tie-break rule: identifier followed by `(` is a tag, even
                // when the identifier spells a keyword.
                if matches!(self.peek()?, Some(t) if t.kind == TokenKind::LParen) {
                    return self.parse_tagged(name.to_string());
                }
                match name {
                    "null" => Ok(DuperValue::Null),
                    "true" => Ok(DuperValue::Bool(true)),
                    "false" => Ok(DuperValue::Bool(false)),
                    _ => Err(self.unexpected(
                        position,
                        "a value",
                        format!("identifier `{name}`"),
                    )),
                }
            }
            other => Err(self.unexpected(position, "a value", other.describe())),
        }
    }

    /// Parse `Tag( payload )`. The opening identifier is already consumed and
    /// the lookahead is the `(`.
    fn parse_tagged(&mut self, tag: String) -> Result<DuperValue> {
        self.advance()?; // the `(`
        let payload_position = match self.peek()? {
            Some(token) => token.position,
            None => self.eof_position(),
        };
        let payload = self.parse_value()?;
        if matches!(payload, DuperValue::Tagged { .. }) {
            return Err(self.unexpected(
                payload_position,
                "a map, list, or scalar payload",
                "a tagged value".to_string(),
            ));
        }
        match self.advance()? {
            Some(token) if token.kind == TokenKind::RParen => Ok(DuperValue::Tagged {
                tag,
                value: Box::new(payload),
            }),
            Some(token) => Err(self.unexpected_token(&token, "`)`")),
            None => Err(self.unexpected_end("`)`")),
        }
    }

    /// Parse the body of a list; the `[` is already consumed.
    fn parse_list(&mut self) -> Result<DuperValue> {
        let mut items = Vec::new();
        loop {
            if matches!(self.peek()?, Some(t) if t.kind == TokenKind::RBracket) {
                self.advance()?;
                return Ok(DuperValue::List(items));
            }
            items.push(self.parse_value()?);
            match self.advance()? {
                Some(token) if token.kind == TokenKind::Comma => continue,
                Some(token) if token.kind == TokenKind::RBracket => {
                    return Ok(DuperValue::List(items));
                }
                Some(token) => return Err(self.unexpected_token(&token, "`,` or `]`")),
                None => return Err(self.unexpected_end("`,` or `]`")),
            }
        }
    }

    /// Parse the body of a map; the `{` is already consumed. Duplicate keys
    /// are preserved in order, not collapsed.
    fn parse_map(&mut self) -> Result<DuperValue> {
        let mut entries = Vec::new();
        loop {
            if matches!(self.peek()?, Some(t) if t.kind == TokenKind::RBrace) {
                self.advance()?;
                return Ok(DuperValue::Map(entries));
            }
            let key = match self.advance()? {
                Some(Token { kind, position }) => match kind {
                    TokenKind::Identifier(name) => name.to_string(),
                    TokenKind::Str(s) => s,
                    other => {
                        return Err(self.unexpected(position, "a key or `}`", other.describe()));
                    }
                },
                None => return Err(self.unexpected_end("a key or `}`")),
            };
            match self.advance()? {
                Some(token) if token.kind == TokenKind::Colon => {}
                Some(token) => return Err(self.unexpected_token(&token, "`:`")),
                None => return Err(self.unexpected_end("`:`")),
            }
            entries.push((key, self.parse_value()?));
            match self.advance()? {
                Some(token) if token.kind == TokenKind::Comma => continue,
                Some(token) if token.kind == TokenKind::RBrace => {
                    return Ok(DuperValue::Map(entries));
                }
                Some(token) => return Err(self.unexpected_token(&token, "`,` or `}`")),
                None => return Err(self.unexpected_end("`,` or `}`")),
            }
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        match self.advance()? {
            None => Ok(()),
            Some(token) => Err(self.unexpected_token(&token, "end of input")),
        }
    }
}
