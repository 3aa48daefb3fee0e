use std::borrow::Cow;
use std::fmt;

use crate::labels::Labels;

/// One requirement of a selector.
///
/// Keys and values borrow from the selector text when parsed, and own their
/// strings when built by the structured adapter or detached with
/// [`Expression::into_owned`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression<'a> {
    Exists(Cow<'a, str>),
    NotExists(Cow<'a, str>),
    In {
        key: Cow<'a, str>,
        values: Vec<Cow<'a, str>>,
    },
    NotIn {
        key: Cow<'a, str>,
        values: Vec<Cow<'a, str>>,
    },
    Equals {
        key: Cow<'a, str>,
        value: Cow<'a, str>,
    },
    NotEquals {
        key: Cow<'a, str>,
        value: Cow<'a, str>,
    },
}

impl<'a> Expression<'a> {
    pub(crate) fn mk_exists(key: impl Into<Cow<'a, str>>) -> Self {
        Expression::Exists(key.into())
    }

    pub(crate) fn mk_not_exists(key: impl Into<Cow<'a, str>>) -> Self {
        Expression::NotExists(key.into())
    }

    pub(crate) fn mk_in<V>(key: impl Into<Cow<'a, str>>, values: V) -> Self
    where
        V: IntoIterator,
        V::Item: Into<Cow<'a, str>>,
    {
        Expression::In {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn mk_not_in<V>(key: impl Into<Cow<'a, str>>, values: V) -> Self
    where
        V: IntoIterator,
        V::Item: Into<Cow<'a, str>>,
    {
        Expression::NotIn {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn mk_equals(key: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        Expression::Equals {
            key: key.into(),
            value: value.into(),
        }
    }

    pub(crate) fn mk_not_equals(
        key: impl Into<Cow<'a, str>>,
        value: impl Into<Cow<'a, str>>,
    ) -> Self {
        Expression::NotEquals {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The label key this requirement inspects.
    pub fn key(&self) -> &str {
        match self {
            Expression::Exists(key)
            | Expression::NotExists(key)
            | Expression::In { key, .. }
            | Expression::NotIn { key, .. }
            | Expression::Equals { key, .. }
            | Expression::NotEquals { key, .. } => key,
        }
    }

    /// Evaluates the requirement against a label set.
    ///
    /// Keys and values compare byte for byte. A missing key never fails
    /// evaluation: it satisfies `NotExists`, `NotIn` and `NotEquals` and
    /// fails the rest.
    pub fn test<L: Labels + ?Sized>(&self, labels: &L) -> bool {
        let found = labels.label(self.key());
        match self {
            Expression::Exists(_) => found.is_some(),
            Expression::NotExists(_) => found.is_none(),
            Expression::In { values, .. } => {
                found.is_some_and(|label| values.iter().any(|v| v == label))
            }
            Expression::NotIn { values, .. } => {
                found.map_or(true, |label| values.iter().all(|v| v != label))
            }
            Expression::Equals { value, .. } => found == Some(&**value),
            Expression::NotEquals { value, .. } => found != Some(&**value),
        }
    }

    pub fn into_owned(self) -> Expression<'static> {
        fn own(s: Cow<'_, str>) -> Cow<'static, str> {
            Cow::Owned(s.into_owned())
        }
        fn own_all(values: Vec<Cow<'_, str>>) -> Vec<Cow<'static, str>> {
            values.into_iter().map(own).collect()
        }
        match self {
            Expression::Exists(key) => Expression::Exists(own(key)),
            Expression::NotExists(key) => Expression::NotExists(own(key)),
            Expression::In { key, values } => Expression::In {
                key: own(key),
                values: own_all(values),
            },
            Expression::NotIn { key, values } => Expression::NotIn {
                key: own(key),
                values: own_all(values),
            },
            Expression::Equals { key, value } => Expression::Equals {
                key: own(key),
                value: own(value),
            },
            Expression::NotEquals { key, value } => Expression::NotEquals {
                key: own(key),
                value: own(value),
            },
        }
    }
}

impl fmt::Display for Expression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Exists(key) => write!(f, "{key}"),
            Expression::NotExists(key) => write!(f, "!{key}"),
            Expression::In { key, values } => write!(f, "{key} in ({})", values.join(", ")),
            Expression::NotIn { key, values } => {
                write!(f, "{key} notin ({})", values.join(", "))
            }
            Expression::Equals { key, value } => write!(f, "{key}={value}"),
            Expression::NotEquals { key, value } => write!(f, "{key}!={value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn labels() -> HashMap<String, String> {
        HashMap::from([
            (String::from("environment"), String::from("production")),
            (String::from("tier"), String::from("frontend")),
        ])
    }

    #[test]
    fn create_in() {
        let node = Expression::mk_in("environment", ["production", "qa"]);
        assert_matches!(&node, Expression::In { key, values } => {
            assert_eq!(key, "environment");
            assert_eq!(values.len(), 2);
        });
        assert_eq!(node.key(), "environment");
    }

    #[test]
    fn exists() {
        let labels = labels();
        assert!(Expression::mk_exists("tier").test(&labels));
        assert!(!Expression::mk_exists("partition").test(&labels));
        assert!(!Expression::mk_not_exists("tier").test(&labels));
        assert!(Expression::mk_not_exists("partition").test(&labels));
    }

    #[test]
    fn set_membership() {
        let labels = labels();
        assert!(Expression::mk_in("environment", ["production", "qa"]).test(&labels));
        assert!(!Expression::mk_in("environment", ["qa"]).test(&labels));
        assert!(!Expression::mk_in("partition", ["a"]).test(&labels));

        assert!(!Expression::mk_not_in("tier", ["frontend", "backend"]).test(&labels));
        assert!(Expression::mk_not_in("tier", ["backend"]).test(&labels));
        assert!(Expression::mk_not_in("partition", ["a"]).test(&labels));
    }

    #[test]
    fn equality() {
        let labels = labels();
        assert!(Expression::mk_equals("tier", "frontend").test(&labels));
        assert!(!Expression::mk_equals("tier", "Frontend").test(&labels));
        assert!(!Expression::mk_equals("partition", "frontend").test(&labels));

        assert!(!Expression::mk_not_equals("tier", "frontend").test(&labels));
        assert!(Expression::mk_not_equals("tier", "backend").test(&labels));
        assert!(Expression::mk_not_equals("partition", "x").test(&labels));
    }

    #[test]
    fn display() {
        assert_eq!(Expression::mk_exists("a").to_string(), "a");
        assert_eq!(Expression::mk_not_exists("a").to_string(), "!a");
        assert_eq!(Expression::mk_in("a", ["b", "c"]).to_string(), "a in (b, c)");
        assert_eq!(Expression::mk_not_in("a", ["b"]).to_string(), "a notin (b)");
        assert_eq!(Expression::mk_equals("a", "b").to_string(), "a=b");
        assert_eq!(Expression::mk_not_equals("a", "b").to_string(), "a!=b");
    }

    #[test]
    fn into_owned() {
        let text = String::from("tier");
        let owned = Expression::mk_in(text.as_str(), [text.as_str()]).into_owned();
        drop(text);
        assert_eq!(owned.to_string(), "tier in (tier)");
        assert_matches!(owned, Expression::In { key: Cow::Owned(_), .. });
    }
}
