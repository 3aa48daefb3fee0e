//! Kubernetes style label selectors.
//!
//! Selector text such as `environment in (production, qa), !canary` is
//! tokenized, parsed into a [`Selector`] and tested against a label set:
//!
//! ```
//! use std::collections::HashMap;
//!
//! let labels = HashMap::from([("environment", "production")]);
//! assert_eq!(label_selector::test(&labels, "environment in (production, qa)"), Ok(true));
//! assert_eq!(label_selector::test(&labels, "!environment"), Ok(false));
//! ```

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

pub mod error;
pub mod json;
pub mod labels;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod selector;
mod stream;

pub use error::{JsonError, ParseError};
pub use json::parse_json;
pub use labels::Labels;
pub use lexer::{tokenize, Token, TokenKind};
pub use node::Expression;
pub use parser::Parser;
pub use selector::Selector;

/// Parses selector text with the default (non-strict) parser.
pub fn parse(input: &str) -> Result<Selector<'_>, ParseError> {
    Parser::new().parse(input)
}

/// Parses `selector` and tests it against `labels`.
pub fn test<L: Labels + ?Sized>(labels: &L, selector: &str) -> Result<bool, ParseError> {
    Ok(parse(selector)?.matches(labels))
}

/// Tests already parsed requirements against `labels`.
pub fn test_expressions<L: Labels + ?Sized>(labels: &L, expressions: &[Expression<'_>]) -> bool {
    selector::matches_all(expressions, labels)
}
