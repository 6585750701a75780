//! Predicate construction from a resolved field and its content.

use serde::Serialize;

use super::classifier::{classify, strip_quotes, Classification};
use super::error::QueryError;
use super::parser::{split_operator, Operator};
use crate::schema::FieldKind;

/// A condition on one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub field: &'static str,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Condition {
    /// Whole stored value equals the text.
    ExactMatch(String),
    /// Stored value contains the text (case-sensitive).
    SubstringMatch(String),
    /// Stored value differs from the text.
    Exclude(String),
    /// Stored value, cast to a number, is below the bound.
    LessThan(f64),
    /// Stored value, cast to a number, is above the bound.
    GreaterThan(f64),
}

/// Build a predicate for `field` from the content of its clause.
pub fn build(
    field: &'static str,
    kind: FieldKind,
    content: &str,
) -> Result<Predicate, QueryError> {
    let (operator, value) = split_operator(content);

    let class = classify(kind, value);
    if class.is_invalid() {
        return Err(QueryError::TypeMismatch {
            field: field.to_string(),
            kind,
            value: value.to_string(),
        });
    }

    let condition = match operator {
        Some(Operator::Not) => Condition::Exclude(strip_quotes(value).0.to_string()),
        Some(op @ (Operator::Lt | Operator::Gt)) => match class {
            Classification::Comparable(bound) if op == Operator::Lt => Condition::LessThan(bound),
            Classification::Comparable(bound) => Condition::GreaterThan(bound),
            _ => {
                return Err(QueryError::OperatorNotApplicable {
                    field: field.to_string(),
                    operator: op,
                    value: value.to_string(),
                })
            }
        },
        None => match strip_quotes(value) {
            (inner, true) => Condition::ExactMatch(inner.to_string()),
            (plain, false) => Condition::SubstringMatch(plain.to_string()),
        },
    };

    Ok(Predicate { field, condition })
}
