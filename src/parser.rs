use crate::error::ParseError;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::node::Expression;
use crate::selector::Selector;
use crate::stream::{unexpected, TokenStream};

const REQUIREMENT_START: &[TokenKind] = &[TokenKind::Value, TokenKind::Exclamation];
const AFTER_KEY: &[TokenKind] = &[
    TokenKind::Comma,
    TokenKind::In,
    TokenKind::NotIn,
    TokenKind::Equal,
    TokenKind::NotEqual,
];
const AFTER_KEY_STRICT: &[TokenKind] = &[TokenKind::Comma, TokenKind::In, TokenKind::NotIn];
const LIST_NEXT: &[TokenKind] = &[TokenKind::Comma, TokenKind::CloseParen];

/// Recursive descent parser for selector text.
///
/// ```text
/// selector    := requirement (',' requirement)* ','?
/// requirement := '!' KEY | KEY | KEY 'in' list | KEY 'notin' list
///              | KEY '=' VALUE | KEY '!=' VALUE
/// list        := '(' VALUE (',' VALUE)* ')'
/// ```
///
/// In strict mode the equality forms are rejected.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    strict: bool,
}

impl Parser {
    pub fn new() -> Parser {
        Parser { strict: false }
    }

    pub fn strict(self: &mut Self, strict: bool) {
        self.strict = strict;
    }

    fn arraylist<'a>(
        self: &Self,
        it: &mut TokenStream<'_, 'a>,
    ) -> Result<Vec<&'a str>, ParseError> {
        it.expect(&[TokenKind::OpenParen])?;
        let mut values = Vec::new();
        loop {
            values.push(it.expect(&[TokenKind::Value])?.text);
            if it.expect(LIST_NEXT)?.kind == TokenKind::CloseParen {
                return Ok(values);
            }
        }
    }

    fn after_key<'a>(
        self: &Self,
        it: &mut TokenStream<'_, 'a>,
        key: &'a str,
    ) -> Result<Expression<'a>, ParseError> {
        let tok = match it.peek() {
            None => return Ok(Expression::mk_exists(key)),
            Some(tok) => *tok,
        };
        let expected = if self.strict {
            AFTER_KEY_STRICT
        } else {
            AFTER_KEY
        };
        match tok.kind {
            // the comma is left for the selector loop
            TokenKind::Comma => Ok(Expression::mk_exists(key)),
            TokenKind::In => {
                it.next();
                Ok(Expression::mk_in(key, self.arraylist(it)?))
            }
            TokenKind::NotIn => {
                it.next();
                Ok(Expression::mk_not_in(key, self.arraylist(it)?))
            }
            TokenKind::Equal if !self.strict => {
                it.next();
                let value = it.expect(&[TokenKind::Value])?;
                Ok(Expression::mk_equals(key, value.text))
            }
            TokenKind::NotEqual if !self.strict => {
                it.next();
                let value = it.expect(&[TokenKind::Value])?;
                Ok(Expression::mk_not_equals(key, value.text))
            }
            _ => Err(unexpected(&tok, expected)),
        }
    }

    fn requirement<'a>(
        self: &Self,
        it: &mut TokenStream<'_, 'a>,
    ) -> Result<Expression<'a>, ParseError> {
        let tok = it.expect(REQUIREMENT_START)?;
        if tok.kind == TokenKind::Exclamation {
            let key = it.expect(&[TokenKind::Value])?;
            return Ok(Expression::mk_not_exists(key.text));
        }
        self.after_key(it, tok.text)
    }

    /// Parses an already tokenized selector.
    pub fn parse_tokens<'a>(self: &Self, tokens: &[Token<'a>]) -> Result<Selector<'a>, ParseError> {
        let mut it = TokenStream::new(tokens);
        let mut expressions = Vec::new();
        while it.has_token() {
            expressions.push(self.requirement(&mut it)?);
            if !it.has_token() {
                break;
            }
            it.expect(&[TokenKind::Comma])?;
        }
        Ok(Selector::new(expressions))
    }

    pub fn parse<'a>(self: &Self, input: &'a str) -> Result<Selector<'a>, ParseError> {
        let tokens = tokenize(input)?;
        let selector = self.parse_tokens(&tokens)?;
        log::debug!(
            "parsed {} requirement(s) from selector `{}`",
            selector.len(),
            input
        );
        Ok(selector)
    }
}
