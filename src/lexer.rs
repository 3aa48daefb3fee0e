use std::fmt;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Value,
    OpenParen,
    CloseParen,
    Equal,
    NotEqual,
    In,
    NotIn,
    Exclamation,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Value => "value",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::Equal => "`=`",
            TokenKind::NotEqual => "`!=`",
            TokenKind::In => "`in`",
            TokenKind::NotIn => "`notin`",
            TokenKind::Exclamation => "`!`",
            TokenKind::Comma => "`,`",
        };
        f.write_str(name)
    }
}

/// A classified slice of the selector text.
///
/// `offset` is the byte position of `text` inside the tokenized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

// Longest literal first so `==` and `!=` win over `=` and `!`.
const COEXIST: [(&str, TokenKind); 7] = [
    ("==", TokenKind::Equal),
    ("!=", TokenKind::NotEqual),
    ("=", TokenKind::Equal),
    ("!", TokenKind::Exclamation),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    (",", TokenKind::Comma),
];

const MONOPOLY: [(&str, TokenKind); 2] = [("notin", TokenKind::NotIn), ("in", TokenKind::In)];

fn coexist(s: &str) -> Option<(TokenKind, usize)> {
    COEXIST
        .iter()
        .find(|(lit, _)| s.starts_with(lit))
        .map(|(lit, kind)| (*kind, lit.len()))
}

/// A keyword only counts when nothing follows it in the chunk, or when a
/// coexist operator does. `notinvalid` therefore stays a value.
fn monopoly(s: &str) -> Option<(TokenKind, usize)> {
    MONOPOLY
        .iter()
        .find(|(lit, _)| {
            s.strip_prefix(lit)
                .is_some_and(|rest| rest.is_empty() || coexist(rest).is_some())
        })
        .map(|(lit, kind)| (*kind, lit.len()))
}

/// Length of the value at the start of `s`: up to the next coexist operator.
fn value_len(s: &str) -> usize {
    s.char_indices()
        .find(|(i, _)| coexist(&s[*i..]).is_some())
        .map_or(s.len(), |(i, _)| i)
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Lexer {
            input,
            tokens: Vec::new(),
        }
    }

    fn push(self: &mut Self, kind: TokenKind, start: usize, len: usize) {
        let token = Token {
            kind,
            text: &self.input[start..start + len],
            offset: start,
        };
        log::trace!("token {:?} `{}` at byte {}", token.kind, token.text, token.offset);
        self.tokens.push(token);
    }

    fn lex_chunk(self: &mut Self, start: usize, end: usize) -> Result<(), ParseError> {
        let mut pos = start;
        let mut keyword_allowed = true;
        while pos < end {
            let rest = &self.input[pos..end];
            if let Some((kind, len)) = coexist(rest) {
                self.push(kind, pos, len);
                pos += len;
                keyword_allowed = true;
                continue;
            }
            if keyword_allowed {
                if let Some((kind, len)) = monopoly(rest) {
                    self.push(kind, pos, len);
                    pos += len;
                    keyword_allowed = false;
                    continue;
                }
            }
            let len = value_len(rest);
            if len == 0 {
                return Err(ParseError::Unresolved {
                    chunk: String::from(rest),
                    offset: pos,
                });
            }
            self.push(TokenKind::Value, pos, len);
            pos += len;
            keyword_allowed = false;
        }
        Ok(())
    }

    pub(crate) fn lex(mut self) -> Result<Vec<Token<'a>>, ParseError> {
        let mut head = None;
        for (i, ch) in self.input.char_indices() {
            if ch.is_whitespace() {
                if let Some(start) = head.take() {
                    self.lex_chunk(start, i)?;
                }
            } else if head.is_none() {
                head = Some(i);
            }
        }
        if let Some(start) = head {
            let end = self.input.len();
            self.lex_chunk(start, end)?;
        }
        Ok(self.tokens)
    }
}

/// Splits selector text into tokens.
///
/// Whitespace separates chunks and never becomes a token. Inside a chunk,
/// punctuation operators may abut anything, while `in` and `notin` are only
/// keywords when followed by punctuation or the end of the chunk.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    Lexer::new(input).lex()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .iter()
            .map(|tok| tok.kind)
            .collect()
    }

    fn texts(input: &str) -> Vec<&str> {
        tokenize(input)
            .unwrap()
            .iter()
            .map(|tok| tok.text)
            .collect()
    }

    #[test]
    fn empty() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize(" \t\r\n ").unwrap().is_empty());
    }

    #[test]
    fn lex_ops() {
        use TokenKind::*;
        assert_eq!(
            kinds("= == != ! ( ) ,"),
            vec![Equal, Equal, NotEqual, Exclamation, OpenParen, CloseParen, Comma]
        );
        assert_eq!(kinds("!="), vec![NotEqual]);
        assert_eq!(kinds("!!="), vec![Exclamation, NotEqual]);
        assert_eq!(texts("a==b"), vec!["a", "==", "b"]);
    }

    #[test]
    fn notin_selector() {
        use TokenKind::*;
        assert_eq!(
            kinds("key notin (a)"),
            vec![Value, NotIn, OpenParen, Value, CloseParen]
        );
        assert_eq!(
            kinds("environment in (production, qa)"),
            vec![Value, In, OpenParen, Value, Comma, Value, CloseParen]
        );
        assert_eq!(texts("key in(a,b)"), vec!["key", "in", "(", "a", ",", "b", ")"]);
    }

    #[test]
    fn keyword_prefixed_values() {
        let tokens = tokenize("notinvalid").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Value);
        assert_eq!(tokens[0].text, "notinvalid");

        assert_eq!(texts("inside"), vec!["inside"]);
        assert_eq!(kinds("inside"), vec![TokenKind::Value]);
        assert_eq!(kinds("notin"), vec![TokenKind::NotIn]);
        assert_eq!(kinds("in"), vec![TokenKind::In]);
    }

    #[test]
    fn no_keyword_after_value() {
        use TokenKind::*;
        assert_eq!(kinds("xin(a)"), vec![Value, OpenParen, Value, CloseParen]);
        assert_eq!(texts("xin(a)")[0], "xin");
        assert_eq!(kinds("a,in"), vec![Value, Comma, In]);
    }

    #[test]
    fn adjacent_operators() {
        use TokenKind::*;
        assert_eq!(kinds("!key"), vec![Exclamation, Value]);
        assert_eq!(kinds("key!=value"), vec![Value, NotEqual, Value]);
        assert_eq!(kinds("a,b,"), vec![Value, Comma, Value, Comma]);
        assert_eq!(kinds("(a"), vec![OpenParen, Value]);
    }

    #[test]
    fn offsets() {
        let tokens = tokenize("  tier  notin(x)").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|tok| tok.offset).collect();
        assert_eq!(offsets, vec![2, 8, 13, 14, 15]);
    }

    #[test]
    fn unicode_values() {
        assert_eq!(texts("ключ=значение"), vec!["ключ", "=", "значение"]);
        assert_eq!(texts("a\u{3000}b"), vec!["a", "b"]);
    }

    #[test]
    fn values_never_contain_whitespace() {
        for tok in tokenize("a in (b,\tc )\n,d").unwrap() {
            assert!(!tok.text.chars().any(char::is_whitespace));
        }
    }
}
