//! Single pass cursor over a token slice with one token of lookahead.

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};

pub(crate) struct TokenStream<'t, 'a> {
    tokens: &'t [Token<'a>],
    index: usize,
}

impl<'t, 'a> TokenStream<'t, 'a> {
    pub(crate) fn new(tokens: &'t [Token<'a>]) -> Self {
        TokenStream { tokens, index: 0 }
    }

    pub(crate) fn has_token(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.index)
    }

    pub(crate) fn next(&mut self) -> Option<Token<'a>> {
        let tok = *self.tokens.get(self.index)?;
        self.index += 1;
        Some(tok)
    }

    /// Consumes the next token if its kind is one of `expected`.
    pub(crate) fn expect(
        &mut self,
        expected: &'static [TokenKind],
    ) -> Result<Token<'a>, ParseError> {
        match self.next() {
            Some(tok) if expected.contains(&tok.kind) => Ok(tok),
            Some(tok) => Err(unexpected(&tok, expected)),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }
}

pub(crate) fn unexpected(tok: &Token<'_>, expected: &'static [TokenKind]) -> ParseError {
    ParseError::UnexpectedToken {
        kind: tok.kind,
        text: String::from(tok.text),
        offset: tok.offset,
        expected,
    }
}
