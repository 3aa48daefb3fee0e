//! Structured requirements, decoded straight into expressions.
//!
//! ```json
//! {"operator": "In", "key": "tier", "values": ["frontend", "backend"]}
//! ```
//!
//! An array of such records is read as a conjunction.

use serde::Deserialize;

use crate::error::JsonError;
use crate::node::Expression;
use crate::selector::Selector;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonRequirement {
    operator: String,
    key: String,
    #[serde(default)]
    values: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonSelector {
    One(JsonRequirement),
    Many(Vec<JsonRequirement>),
}

impl TryFrom<JsonRequirement> for Expression<'static> {
    type Error = JsonError;

    fn try_from(req: JsonRequirement) -> Result<Self, Self::Error> {
        let JsonRequirement {
            operator,
            key,
            values,
        } = req;
        let op = operator.to_lowercase();
        match op.as_str() {
            "in" | "notin" => {
                let values = match values {
                    Some(values) if !values.is_empty() => values,
                    _ => return Err(JsonError::MissingValues { operator, key }),
                };
                if op == "in" {
                    Ok(Expression::mk_in(key, values))
                } else {
                    Ok(Expression::mk_not_in(key, values))
                }
            }
            "exists" => Ok(Expression::mk_exists(key)),
            "notexists" => Ok(Expression::mk_not_exists(key)),
            _ => Err(JsonError::UnknownOperator(operator)),
        }
    }
}

/// Decodes one structured requirement, or an array of them.
pub fn parse_json(input: &str) -> Result<Selector<'static>, JsonError> {
    let requirements = match serde_json::from_str::<JsonSelector>(input)? {
        JsonSelector::One(req) => vec![req],
        JsonSelector::Many(reqs) => reqs,
    };
    let selector = requirements
        .into_iter()
        .map(Expression::try_from)
        .collect::<Result<Selector<'static>, _>>()?;
    log::debug!("decoded {} structured requirement(s)", selector.len());
    Ok(selector)
}
