//! Filter-expression compiler for catalog searches.
//!
//! # Syntax Overview
//!
//! Full pattern: `entity.field:content [AND|OR entity.field:content]`
//!
//! - **Entity**: `book` or `author`
//! - **Field**: any declared attribute of the entity (`book.rating_count`)
//! - **Contains**: `book.title:rust` matches titles containing `rust`
//! - **Exact**: `book.book_id:"2048"` matches the whole value
//! - **Exclusion**: `book.ISBN: NOT 123`
//! - **Comparison**: `author.rating: > 4.2` (numeric fields, unquoted values)
//! - **Connective**: one `AND` or `OR` between two clauses on the same entity
//!
//! Connectives are whole words outside double quotes, and operators are only
//! recognized at the start of a clause's content, so `book.title:"Pride AND
//! Prejudice"` and `book.title:NOTES` are plain values.

mod classifier;
mod error;
mod filter;
mod parser;
mod predicate;

pub use classifier::{classify, strip_quotes, Classification};
pub use error::{ErrorCode, QueryError};
pub use parser::{parse_clause, split_connective, split_operator, Clause, Connective, Operator};
pub use predicate::{build, Condition, Predicate};

use serde::Serialize;

use crate::schema::{resolve_entity, resolve_field, Entity};

/// A compiled query: one predicate, or two joined by a connective.
///
/// Both predicates of a compound query address the same entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeQuery {
    Single(Predicate),
    Compound {
        connective: Connective,
        left: Predicate,
        right: Predicate,
    },
}

impl CompositeQuery {
    /// Predicates in source order.
    pub fn predicates(&self) -> Vec<&Predicate> {
        match self {
            CompositeQuery::Single(p) => vec![p],
            CompositeQuery::Compound { left, right, .. } => vec![left, right],
        }
    }
}

/// Compile a filter expression into the entity it targets and its query.
pub fn compile(raw: &str) -> Result<(Entity, CompositeQuery), QueryError> {
    let compiled = match split_connective(raw)? {
        Some((connective, left, right)) => compile_compound(connective, left, right),
        None => compile_single(raw),
    };

    match &compiled {
        Ok((entity, query)) => {
            tracing::debug!(%entity, query = ?query, "compiled query {:?}", raw)
        }
        Err(e) => tracing::debug!(code = %e.code(), "rejected query {:?}: {}", raw, e),
    }

    compiled
}

fn compile_single(raw: &str) -> Result<(Entity, CompositeQuery), QueryError> {
    let clause = parse_clause(raw)?;
    let entity = resolve_entity(clause.entity)?;
    let (field, kind) = resolve_field(entity, clause.field)?;
    let predicate = build(field, kind, clause.content)?;
    Ok((entity, CompositeQuery::Single(predicate)))
}

fn compile_compound(
    connective: Connective,
    left: &str,
    right: &str,
) -> Result<(Entity, CompositeQuery), QueryError> {
    // Both sides must be well-formed before anything is resolved
    let left = parse_clause(left)?;
    let right = parse_clause(right)?;

    let entity = resolve_entity(left.entity)?;
    let right_entity = resolve_entity(right.entity)?;
    if right_entity != entity {
        return Err(QueryError::EntityMismatch {
            left: entity,
            right: right_entity,
        });
    }

    let (left_field, left_kind) = resolve_field(entity, left.field)?;
    let (right_field, right_kind) = resolve_field(entity, right.field)?;

    let left = build(left_field, left_kind, left.content)?;
    let right = build(right_field, right_kind, right.content)?;

    Ok((entity, CompositeQuery::Compound { connective, left, right }))
}
