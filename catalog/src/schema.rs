//! Schema registry for the two document collections.
//!
//! Attribute sets are fixed at compile time and mirror the persisted
//! documents. A field's [`FieldKind`] depends only on its name, so `rating`
//! is a float whether it belongs to a book or an author.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::query::QueryError;

/// Attributes stored on book documents.
pub const BOOK_ATTRIBUTES: &[&str] = &[
    "book_url",
    "title",
    "book_id",
    "ISBN",
    "author_url",
    "author",
    "rating",
    "rating_count",
    "review_count",
    "image_url",
    "similar_books",
];

/// Attributes stored on author documents.
pub const AUTHOR_ATTRIBUTES: &[&str] = &[
    "name",
    "author_url",
    "author_id",
    "rating",
    "rating_count",
    "review_count",
    "image_url",
    "related_authors",
    "author_books",
];

const INTEGER_FIELDS: &[&str] = &["book_id", "author_id", "rating_count", "review_count"];
const FLOAT_FIELDS: &[&str] = &["rating"];

/// A document collection the query language can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Book,
    Author,
}

/// Expected value kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Integer,
    Float,
    Text,
}

impl Entity {
    /// Every entity, in display order.
    pub fn all() -> [Entity; 2] {
        [Entity::Book, Entity::Author]
    }

    /// Name used in query expressions (`book`, `author`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Book => "book",
            Entity::Author => "author",
        }
    }

    /// Key of this entity's array in the catalog file.
    pub fn collection(&self) -> &'static str {
        match self {
            Entity::Book => "books",
            Entity::Author => "authors",
        }
    }

    /// Field holding the document identifier.
    pub fn id_field(&self) -> &'static str {
        match self {
            Entity::Book => "book_id",
            Entity::Author => "author_id",
        }
    }

    pub fn attributes(&self) -> &'static [&'static str] {
        match self {
            Entity::Book => BOOK_ATTRIBUTES,
            Entity::Author => AUTHOR_ATTRIBUTES,
        }
    }

    /// Look up a declared attribute, returning the static name and its kind.
    pub fn field(&self, name: &str) -> Option<(&'static str, FieldKind)> {
        self.attributes()
            .iter()
            .find(|attr| **attr == name)
            .map(|attr| (*attr, FieldKind::of(attr)))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

impl FieldKind {
    /// Kind of a field by name. Names outside the numeric tables are text.
    pub fn of(field: &str) -> FieldKind {
        if INTEGER_FIELDS.contains(&field) {
            FieldKind::Integer
        } else if FLOAT_FIELDS.contains(&field) {
            FieldKind::Float
        } else {
            FieldKind::Text
        }
    }
}

/// Resolve an entity name from a query expression.
pub fn resolve_entity(name: &str) -> Result<Entity, QueryError> {
    name.parse()
}

/// Resolve a field on an entity, returning its static name and kind.
pub fn resolve_field(
    entity: Entity,
    name: &str,
) -> Result<(&'static str, FieldKind), QueryError> {
    entity.field(name).ok_or_else(|| QueryError::UnknownField {
        entity,
        field: name.to_string(),
    })
}

impl FromStr for Entity {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(Entity::Book),
            "author" => Ok(Entity::Author),
            other => Err(QueryError::UnknownEntity(other.to_string())),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::Text => write!(f, "text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("book").unwrap(), Entity::Book);
        assert_eq!(resolve_entity("author").unwrap(), Entity::Author);
        assert!(matches!(
            resolve_entity("dog"),
            Err(QueryError::UnknownEntity(name)) if name == "dog"
        ));
        // Names are case-sensitive
        assert!(resolve_entity("Book").is_err());
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(FieldKind::of("book_id"), FieldKind::Integer);
        assert_eq!(FieldKind::of("author_id"), FieldKind::Integer);
        assert_eq!(FieldKind::of("rating_count"), FieldKind::Integer);
        assert_eq!(FieldKind::of("review_count"), FieldKind::Integer);
        assert_eq!(FieldKind::of("rating"), FieldKind::Float);
        assert_eq!(FieldKind::of("title"), FieldKind::Text);
        assert_eq!(FieldKind::of("ISBN"), FieldKind::Text);
    }

    #[test]
    fn test_resolve_field_per_entity() {
        assert_eq!(
            resolve_field(Entity::Book, "book_id").unwrap(),
            ("book_id", FieldKind::Integer)
        );
        assert_eq!(
            resolve_field(Entity::Author, "rating").unwrap(),
            ("rating", FieldKind::Float)
        );
        // author_id is not a book attribute
        assert!(matches!(
            resolve_field(Entity::Book, "author_id"),
            Err(QueryError::UnknownField { entity: Entity::Book, .. })
        ));
        assert!(resolve_field(Entity::Author, "title").is_err());
    }

    #[test]
    fn test_id_fields_are_declared_integers() {
        for entity in Entity::all() {
            let (_, kind) = entity.field(entity.id_field()).unwrap();
            assert_eq!(kind, FieldKind::Integer);
        }
    }
}
