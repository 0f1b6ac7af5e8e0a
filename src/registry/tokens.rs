//! Token source for type expressions.
//!
//! Parser functions receive a [`TokenStream`] positioned at the type keyword
//! and consume as much of the expression as their kind needs.

use logos::Logos;

use crate::diag::{ResolveError, ResolveResult};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TypeToken {
    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token(",")]
    Comma,

    #[token("*")]
    Star,

    #[token("&")]
    Amp,

    #[token("::")]
    ColonColon,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    Number,
}

/// A lexed type expression with a cursor.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    source: &'a str,
    tokens: Vec<(TypeToken, &'a str)>,
    pos: usize,
    line: u32,
}

impl<'a> TokenStream<'a> {
    /// Lex `source`; any character outside the type grammar is an error.
    pub fn new(source: &'a str, line: u32) -> ResolveResult<Self> {
        let mut lexer = TypeToken::lexer(source);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next() {
            match token {
                Ok(token) => tokens.push((token, lexer.slice())),
                Err(()) => {
                    return Err(ResolveError::at(
                        line,
                        format!("Unexpected '{}' in type '{}'", lexer.slice(), source.trim()),
                    ));
                }
            }
        }
        Ok(Self {
            source,
            tokens,
            pos: 0,
            line,
        })
    }

    pub fn source(&self) -> &'a str {
        self.source.trim()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn peek(&self) -> Option<(TypeToken, &'a str)> {
        self.tokens.get(self.pos).copied()
    }

    pub fn peek_is(&self, kind: TypeToken) -> bool {
        matches!(self.peek(), Some((k, _)) if k == kind)
    }

    pub fn peek_ident(&self, text: &str) -> bool {
        matches!(self.peek(), Some((TypeToken::Identifier, t)) if t == text)
    }

    pub fn advance(&mut self) -> Option<(TypeToken, &'a str)> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the next token if it is `kind`.
    pub fn eat(&mut self, kind: TypeToken) -> bool {
        if self.peek_is(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume the identifier `text` if it is next.
    pub fn eat_ident(&mut self, text: &str) -> bool {
        if self.peek_ident(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Drop a trailing token of `kind`, reporting whether one was there.
    pub fn pop_trailing(&mut self, kind: TypeToken) -> bool {
        match self.tokens.last() {
            Some((k, _)) if *k == kind && self.tokens.len() > self.pos => {
                self.tokens.pop();
                true
            }
            _ => false,
        }
    }

    /// Drop a trailing identifier `text`, reporting whether one was there.
    pub fn pop_trailing_ident(&mut self, text: &str) -> bool {
        match self.tokens.last() {
            Some((TypeToken::Identifier, t)) if *t == text && self.tokens.len() > self.pos + 1 => {
                self.tokens.pop();
                true
            }
            _ => false,
        }
    }

    pub fn expect(&mut self, kind: TypeToken, what: &str) -> ResolveResult<&'a str> {
        match self.advance() {
            Some((k, text)) if k == kind => Ok(text),
            Some((_, text)) => Err(self.error(format!("Expected {what} but found '{text}'"))),
            None => Err(self.error(format!("Expected {what}"))),
        }
    }

    pub fn expect_identifier(&mut self) -> ResolveResult<&'a str> {
        self.expect(TypeToken::Identifier, "a type name")
    }

    /// Identifier with optional `Outer::` qualification, returned as written.
    pub fn expect_path(&mut self) -> ResolveResult<String> {
        let mut path = self.expect_identifier()?.to_string();
        while self.eat(TypeToken::ColonColon) {
            path.push_str("::");
            path.push_str(self.expect_identifier()?);
        }
        Ok(path)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Error unless every token was consumed.
    pub fn expect_end(&self) -> ResolveResult<()> {
        match self.peek() {
            None => Ok(()),
            Some((_, text)) => Err(self.error(format!("Unexpected '{text}' in type '{}'", self.source()))),
        }
    }

    pub fn error(&self, message: impl Into<String>) -> ResolveError {
        ResolveError::at(self.line, message)
    }
}
