use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::labels::Labels;
use crate::node::Expression;
use crate::parser::Parser;

/// An ordered conjunction of requirements.
///
/// Nothing in a selector changes after parsing, so one value can be shared
/// between threads and tested against any number of label sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector<'a> {
    expressions: Vec<Expression<'a>>,
}

impl<'a> Selector<'a> {
    pub fn new(expressions: Vec<Expression<'a>>) -> Self {
        Selector { expressions }
    }

    pub fn expressions(&self) -> &[Expression<'a>] {
        &self.expressions
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expression<'a>> {
        self.expressions.iter()
    }

    /// True when every requirement holds. Stops at the first one that fails.
    pub fn matches<L: Labels + ?Sized>(&self, labels: &L) -> bool {
        matches_all(&self.expressions, labels)
    }

    pub fn into_owned(self) -> Selector<'static> {
        Selector {
            expressions: self
                .expressions
                .into_iter()
                .map(Expression::into_owned)
                .collect(),
        }
    }
}

pub(crate) fn matches_all<L: Labels + ?Sized>(expressions: &[Expression<'_>], labels: &L) -> bool {
    expressions.iter().all(|expression| {
        let ok = expression.test(labels);
        if !ok {
            log::trace!("requirement `{}` not satisfied", expression);
        }
        ok
    })
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, expression) in self.expressions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{expression}")?;
        }
        Ok(())
    }
}

impl FromStr for Selector<'static> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Parser::new().parse(s)?.into_owned())
    }
}

impl<'a> FromIterator<Expression<'a>> for Selector<'a> {
    fn from_iter<I: IntoIterator<Item = Expression<'a>>>(iter: I) -> Self {
        Selector::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for Selector<'a> {
    type Item = Expression<'a>;
    type IntoIter = std::vec::IntoIter<Expression<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.expressions.into_iter()
    }
}

impl<'s, 'a> IntoIterator for &'s Selector<'a> {
    type Item = &'s Expression<'a>;
    type IntoIter = std::slice::Iter<'s, Expression<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.expressions.iter()
    }
}
