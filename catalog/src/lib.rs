//! Catalog: query compiler and document store for scraped book/author records.
//!
//! The heart of the crate is [`query::compile`], which turns a filter
//! expression such as `book.rating_count: > 100 AND book.title:Rust` into a
//! typed [`query::CompositeQuery`] bound to one [`schema::Entity`]. The
//! [`store::Catalog`] evaluates compiled queries against a JSON-backed
//! collection pair and provides id-based CRUD, import/export and top-k views.

pub mod config;
pub mod error;
pub mod query;
pub mod schema;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use query::{
    compile, Condition, CompositeQuery, Connective, ErrorCode, Predicate, QueryError,
};
pub use schema::{Entity, FieldKind};
pub use store::{validate_document, Catalog, Document, ImportFile, ImportStats};
