use thiserror::Error;

use crate::lexer::TokenKind;

/// Errors produced while turning selector text into expressions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token of the wrong kind was found.
    #[error("unexpected {kind} `{text}` at byte {offset}, expected {}", expected_list(.expected))]
    UnexpectedToken {
        kind: TokenKind,
        text: String,
        offset: usize,
        expected: &'static [TokenKind],
    },

    /// The token stream ended in the middle of a requirement.
    #[error("unexpected end of selector, expected {}", expected_list(.expected))]
    UnexpectedEnd { expected: &'static [TokenKind] },

    /// A chunk could not be split into tokens.
    #[error("unable to tokenize `{chunk}` at byte {offset}")]
    Unresolved { chunk: String, offset: usize },
}

/// Errors produced by the structured requirement adapter.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    #[error("operator `{operator}` on key `{key}` requires at least one value")]
    MissingValues { operator: String, key: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn expected_list(kinds: &[TokenKind]) -> String {
    let names: Vec<String> = kinds.iter().map(ToString::to_string).collect();
    match names.split_last() {
        None => String::from("nothing"),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}
