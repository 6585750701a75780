//! In-process evaluation of compiled queries against documents.
//!
//! Follows document-store semantics: list fields match when any element
//! matches, and comparisons cast the stored value to a number.

use serde_json::Value;

use super::Document;
use crate::query::{CompositeQuery, Condition, Connective, Predicate};

impl Predicate {
    pub fn matches(&self, doc: &Document) -> bool {
        let stored = doc.get(self.field);

        match &self.condition {
            Condition::ExactMatch(value) => {
                stored.is_some_and(|s| any_text(s, |t| t == value.as_str()))
            }
            Condition::SubstringMatch(value) => {
                stored.is_some_and(|s| any_text(s, |t| t.contains(value.as_str())))
            }
            // A missing field is never equal, so it is excluded from nothing
            Condition::Exclude(value) => {
                !stored.is_some_and(|s| any_text(s, |t| t == value.as_str()))
            }
            Condition::LessThan(bound) => {
                stored.and_then(as_number).is_some_and(|n| n < *bound)
            }
            Condition::GreaterThan(bound) => {
                stored.and_then(as_number).is_some_and(|n| n > *bound)
            }
        }
    }
}

impl CompositeQuery {
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            CompositeQuery::Single(p) => p.matches(doc),
            CompositeQuery::Compound { connective: Connective::And, left, right } => {
                left.matches(doc) && right.matches(doc)
            }
            CompositeQuery::Compound { connective: Connective::Or, left, right } => {
                left.matches(doc) || right.matches(doc)
            }
        }
    }
}

fn any_text(value: &Value, test: impl Fn(&str) -> bool) -> bool {
    match value {
        Value::String(s) => test(s.as_str()),
        Value::Array(items) => items.iter().filter_map(Value::as_str).any(test),
        _ => false,
    }
}

/// Numeric cast of a stored value. Unparseable and non-finite values never
/// compare.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
