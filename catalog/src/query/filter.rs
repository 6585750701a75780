//! Rendering compiled queries as MongoDB filter documents.

use serde_json::{json, Value};

use super::parser::Connective;
use super::predicate::{Condition, Predicate};
use super::CompositeQuery;

impl Predicate {
    /// Filter document selecting the documents this predicate matches.
    pub fn to_filter(&self) -> Value {
        let field = self.field;
        match &self.condition {
            Condition::ExactMatch(value) => json!({ field: value }),
            Condition::SubstringMatch(value) => {
                json!({ field: { "$regex": format!(".*{}.*", regex::escape(value)) } })
            }
            Condition::Exclude(value) => json!({ field: { "$ne": value } }),
            Condition::LessThan(bound) => {
                json!({ "$expr": { "$lt": [{ "$toDouble": format!("${}", field) }, bound] } })
            }
            Condition::GreaterThan(bound) => {
                json!({ "$expr": { "$gt": [{ "$toDouble": format!("${}", field) }, bound] } })
            }
        }
    }
}

impl CompositeQuery {
    pub fn to_filter(&self) -> Value {
        match self {
            CompositeQuery::Single(predicate) => predicate.to_filter(),
            CompositeQuery::Compound { connective, left, right } => {
                let key = match connective {
                    Connective::And => "$and",
                    Connective::Or => "$or",
                };
                json!({ key: [left.to_filter(), right.to_filter()] })
            }
        }
    }
}
