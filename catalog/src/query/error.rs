//! Compiler error taxonomy.

use std::fmt;

use serde::Serialize;

use super::parser::Operator;
use crate::schema::{Entity, FieldKind};

/// Coarse classification of a compile failure, for mapping onto transport
/// status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Malformed,
    UnknownEntity,
    UnknownField,
    TypeMismatch,
    OperatorNotApplicable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Malformed => "malformed",
            ErrorCode::UnknownEntity => "unknown_entity",
            ErrorCode::UnknownField => "unknown_field",
            ErrorCode::TypeMismatch => "type_mismatch",
            ErrorCode::OperatorNotApplicable => "operator_not_applicable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("malformed query: {0}")]
    Malformed(String),

    #[error("unknown entity '{0}' (expected book or author)")]
    UnknownEntity(String),

    #[error("clauses address different entities: {left} and {right}")]
    EntityMismatch { left: Entity, right: Entity },

    #[error("{entity} has no field '{field}'")]
    UnknownField { entity: Entity, field: String },

    #[error("value '{value}' is not valid for {kind} field '{field}'")]
    TypeMismatch {
        field: String,
        kind: FieldKind,
        value: String,
    },

    #[error("operator '{operator}' is not applicable to '{value}' on field '{field}'")]
    OperatorNotApplicable {
        field: String,
        operator: Operator,
        value: String,
    },
}

impl QueryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            QueryError::Malformed(_) => ErrorCode::Malformed,
            QueryError::UnknownEntity(_) | QueryError::EntityMismatch { .. } => {
                ErrorCode::UnknownEntity
            }
            QueryError::UnknownField { .. } => ErrorCode::UnknownField,
            QueryError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            QueryError::OperatorNotApplicable { .. } => ErrorCode::OperatorNotApplicable,
        }
    }
}
