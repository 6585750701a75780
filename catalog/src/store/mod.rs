//! Document catalog: books and authors persisted as one JSON file.
//!
//! The file layout is the import/export format of the scraper:
//! `{"books": [...], "authors": [...]}`. Documents are flat JSON objects
//! whose values are strings or lists of strings, keyed by the entity's id
//! field (`book_id` / `author_id`).

mod atomic;
mod matcher;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::{classify, compile, CompositeQuery};
use crate::schema::{Entity, FieldKind};
use crate::{Config, Error, Result};

/// A stored book or author record.
pub type Document = Map<String, Value>;

/// Contents of a catalog or import file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportFile {
    #[serde(default)]
    pub books: Vec<Document>,
    #[serde(default)]
    pub authors: Vec<Document>,
}

/// Outcome of merging an import file into the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// In-memory catalog backed by a JSON file.
#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    books: Vec<Document>,
    authors: Vec<Document>,
}

impl Catalog {
    /// Open the catalog under the configured root.
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.catalog_path();
        if !path.exists() {
            return Err(Error::NotInitialized(config.root.clone()));
        }
        Self::load(&path)
    }

    /// Create an empty catalog file, replacing nothing if one exists.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Self::load(&path);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let catalog = Self::empty(path);
        catalog.save()?;
        Ok(catalog)
    }

    /// Empty catalog that will be written to `path` on save.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            books: Vec::new(),
            authors: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read(path)?;
        let file: ImportFile = serde_json::from_slice(&contents)?;
        tracing::debug!(
            books = file.books.len(),
            authors = file.authors.len(),
            "loaded catalog from {}",
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            books: file.books,
            authors: file.authors,
        })
    }

    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_vec_pretty(&self.export())?;
        atomic::write_file(&self.path, &contents)?;
        tracing::info!(
            books = self.books.len(),
            authors = self.authors.len(),
            "saved catalog to {}",
            self.path.display()
        );
        Ok(())
    }

    pub fn documents(&self, entity: Entity) -> &[Document] {
        match entity {
            Entity::Book => &self.books,
            Entity::Author => &self.authors,
        }
    }

    fn documents_mut(&mut self, entity: Entity) -> &mut Vec<Document> {
        match entity {
            Entity::Book => &mut self.books,
            Entity::Author => &mut self.authors,
        }
    }

    pub fn len(&self, entity: Entity) -> usize {
        self.documents(entity).len()
    }

    // Queries

    /// Compile `raw` and return the entity searched plus matching documents.
    pub fn find(&self, raw: &str) -> Result<(Entity, Vec<&Document>)> {
        let (entity, query) = compile(raw)?;
        Ok((entity, self.find_compiled(entity, &query)))
    }

    pub fn find_compiled(&self, entity: Entity, query: &CompositeQuery) -> Vec<&Document> {
        self.documents(entity)
            .iter()
            .filter(|doc| query.matches(doc))
            .collect()
    }

    /// The `k` highest-rated documents. Unrated documents are left out.
    pub fn top(&self, entity: Entity, k: usize) -> Vec<&Document> {
        let mut rated: Vec<(f64, &Document)> = self
            .documents(entity)
            .iter()
            .filter_map(|doc| {
                let rating = doc.get("rating").and_then(matcher::as_number)?;
                Some((rating, doc))
            })
            .collect();
        rated.sort_by(|a, b| b.0.total_cmp(&a.0));
        rated.into_iter().take(k).map(|(_, doc)| doc).collect()
    }

    // Id-based CRUD

    pub fn get(&self, entity: Entity, id: &str) -> Result<&Document> {
        check_id(entity, id)?;
        let index = self.position(entity, id).ok_or_else(|| not_found(entity, id))?;
        Ok(&self.documents(entity)[index])
    }

    /// Insert a new document. Undeclared attributes are dropped.
    pub fn insert(&mut self, entity: Entity, doc: Document) -> Result<()> {
        let doc = prepare(entity, doc)?;
        let id = document_id(entity, &doc)
            .ok_or_else(|| Error::InvalidDocument(format!("missing {}", entity.id_field())))?
            .to_string();
        check_id(entity, &id)?;
        if self.position(entity, &id).is_some() {
            return Err(Error::AlreadyExists(format!("{} with id {}", entity, id)));
        }

        self.documents_mut(entity).push(doc);
        tracing::debug!(%entity, %id, "inserted document");
        Ok(())
    }

    /// Overwrite attributes of an existing document. The id in `patch`, if
    /// any, is ignored in favor of `id`.
    pub fn update(&mut self, entity: Entity, id: &str, patch: Document) -> Result<()> {
        check_id(entity, id)?;
        let index = self.position(entity, id).ok_or_else(|| not_found(entity, id))?;
        let patch = prepare(entity, patch)?;

        let doc = &mut self.documents_mut(entity)[index];
        for (key, value) in patch {
            doc.insert(key, value);
        }
        doc.insert(entity.id_field().to_string(), Value::String(id.to_string()));
        tracing::debug!(%entity, %id, "updated document");
        Ok(())
    }

    pub fn delete(&mut self, entity: Entity, id: &str) -> Result<Document> {
        check_id(entity, id)?;
        let index = self.position(entity, id).ok_or_else(|| not_found(entity, id))?;
        tracing::debug!(%entity, %id, "deleted document");
        Ok(self.documents_mut(entity).remove(index))
    }

    // Bulk transfer

    /// Merge an import file: existing ids are updated, new ids inserted.
    ///
    /// Records without an id or with values that fail validation are skipped.
    pub fn import(&mut self, file: ImportFile) -> ImportStats {
        let mut stats = ImportStats::default();
        let ImportFile { books, authors } = file;

        for (entity, docs) in [(Entity::Book, books), (Entity::Author, authors)] {
            for doc in docs {
                let doc = match prepare(entity, doc) {
                    Ok(doc) => doc,
                    Err(e) => {
                        tracing::warn!(%entity, "skipping record: {}", e);
                        stats.skipped += 1;
                        continue;
                    }
                };
                let Some(id) = document_id(entity, &doc).map(str::to_string) else {
                    tracing::warn!(%entity, "skipping record with no {}", entity.id_field());
                    stats.skipped += 1;
                    continue;
                };

                match self.position(entity, &id) {
                    Some(index) => {
                        self.documents_mut(entity)[index].extend(doc);
                        stats.updated += 1;
                    }
                    None => {
                        self.documents_mut(entity).push(doc);
                        stats.created += 1;
                    }
                }
            }
        }

        tracing::info!(
            created = stats.created,
            updated = stats.updated,
            skipped = stats.skipped,
            "import finished"
        );
        stats
    }

    pub fn export(&self) -> ImportFile {
        ImportFile {
            books: self.books.clone(),
            authors: self.authors.clone(),
        }
    }

    fn position(&self, entity: Entity, id: &str) -> Option<usize> {
        self.documents(entity)
            .iter()
            .position(|doc| document_id(entity, doc) == Some(id))
    }
}

/// Check that every value is a string or list, and that strings fit the
/// kind of their field.
pub fn validate_document(doc: &Document) -> Result<()> {
    for (key, value) in doc {
        match value {
            Value::String(s) => {
                let kind = FieldKind::of(key);
                if classify(kind, s).is_invalid() {
                    return Err(Error::InvalidDocument(format!(
                        "value '{}' is not valid for {} field '{}'",
                        s, kind, key
                    )));
                }
            }
            Value::Array(_) => {}
            _ => {
                return Err(Error::InvalidDocument(format!(
                    "field '{}' must be a string or a list",
                    key
                )))
            }
        }
    }
    Ok(())
}

/// Drop empty strings and undeclared attributes, then validate.
fn prepare(entity: Entity, doc: Document) -> Result<Document> {
    let doc: Document = doc
        .into_iter()
        .filter(|(key, value)| {
            if value.as_str() == Some("") {
                return false;
            }
            let declared = entity.has_field(key);
            if !declared {
                tracing::warn!(%entity, "ignoring undeclared attribute '{}'", key);
            }
            declared
        })
        .collect();
    validate_document(&doc)?;
    Ok(doc)
}

fn document_id(entity: Entity, doc: &Document) -> Option<&str> {
    doc.get(entity.id_field()).and_then(Value::as_str)
}

fn check_id(entity: Entity, id: &str) -> Result<()> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidId(format!("{} id '{}' is not numeric", entity, id)));
    }
    Ok(())
}

fn not_found(entity: Entity, id: &str) -> Error {
    Error::NotFound(format!("{} with id {}", entity, id))
}
