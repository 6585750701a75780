//! CLI command implementations.

use std::path::Path;

use serde_json::{json, Value};

use catalog::{compile as compile_query, Catalog, Config, Document, Entity, ImportFile};

/// Failure of a CLI command, carrying its exit status.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] catalog::Error),

    #[error("No results for '{0}'")]
    NoResults(String),
}

impl CliError {
    /// 2 for bad input, 1 for lookups that found nothing and other failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Catalog(e) if e.is_client_error() => 2,
            _ => 1,
        }
    }
}

type Result<T> = std::result::Result<T, CliError>;

fn print_json(config: &Config, value: &impl serde::Serialize) -> Result<()> {
    let text = if config.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(catalog::Error::from)?;
    println!("{}", text);
    Ok(())
}

fn read_json(path: &str) -> catalog::Result<Value> {
    let contents = std::fs::read_to_string(Path::new(path))?;
    Ok(serde_json::from_str(&contents)?)
}

fn as_document(value: Value) -> catalog::Result<Document> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(catalog::Error::InvalidDocument(
            "content of the file is not a JSON object".to_string(),
        )),
    }
}

/// Create the catalog file and config under the configured root.
pub fn init(config: &Config) -> Result<()> {
    if !config.config_path().exists() {
        config.save()?;
    }

    let path = config.catalog_path();
    if path.exists() {
        println!("Catalog already initialized at {}", path.display());
        return Ok(());
    }

    Catalog::create(&path)?;
    println!("Catalog initialized at {}", path.display());
    Ok(())
}

pub fn search(config: &Config, query: &str, count: bool) -> Result<()> {
    let catalog = Catalog::open(config)?;
    let (entity, documents) = catalog.find(query)?;
    tracing::debug!(%entity, matches = documents.len(), "search finished");

    if count {
        println!("{}", documents.len());
        return Ok(());
    }
    if documents.is_empty() {
        return Err(CliError::NoResults(query.to_string()));
    }
    print_json(config, &documents)
}

/// Print the entity, structured query and document-store filter.
pub fn compile(config: &Config, query: &str) -> Result<()> {
    let (entity, compiled) = compile_query(query).map_err(catalog::Error::from)?;
    print_json(
        config,
        &json!({
            "entity": entity,
            "query": compiled,
            "filter": compiled.to_filter(),
        }),
    )
}

pub fn get(config: &Config, entity: Entity, id: &str) -> Result<()> {
    let catalog = Catalog::open(config)?;
    print_json(config, catalog.get(entity, id)?)
}

pub fn insert(config: &Config, entity: Entity, file: &str) -> Result<()> {
    let mut catalog = Catalog::open(config)?;

    let documents = match read_json(file)? {
        Value::Array(items) => items
            .into_iter()
            .map(as_document)
            .collect::<catalog::Result<Vec<_>>>()?,
        other => vec![as_document(other)?],
    };

    let count = documents.len();
    for doc in documents {
        catalog.insert(entity, doc)?;
    }
    catalog.save()?;

    println!("Inserted {} {}(s)", count, entity);
    Ok(())
}

pub fn update(config: &Config, entity: Entity, id: &str, file: &str) -> Result<()> {
    let mut catalog = Catalog::open(config)?;
    let patch = as_document(read_json(file)?)?;

    catalog.update(entity, id, patch)?;
    catalog.save()?;

    println!("Updated {} with id {}", entity, id);
    Ok(())
}

pub fn delete(config: &Config, entity: Entity, id: &str) -> Result<()> {
    let mut catalog = Catalog::open(config)?;
    catalog.delete(entity, id)?;
    catalog.save()?;

    println!("Deleted {} with id {}", entity, id);
    Ok(())
}

pub fn import(config: &Config, file: &str) -> Result<()> {
    let mut catalog = Catalog::open(config)?;
    let contents: ImportFile =
        serde_json::from_value(read_json(file)?).map_err(catalog::Error::from)?;

    let stats = catalog.import(contents);
    catalog.save()?;

    println!(
        "Imported: {} created, {} updated, {} skipped",
        stats.created, stats.updated, stats.skipped
    );
    Ok(())
}

pub fn export(config: &Config, file: &str) -> Result<()> {
    let catalog = Catalog::open(config)?;
    let contents = serde_json::to_vec_pretty(&catalog.export()).map_err(catalog::Error::from)?;
    std::fs::write(file, contents).map_err(catalog::Error::from)?;

    println!(
        "Exported {} books and {} authors to {}",
        catalog.len(Entity::Book),
        catalog.len(Entity::Author),
        file
    );
    Ok(())
}

pub fn top(config: &Config, entity: Entity, k: Option<usize>) -> Result<()> {
    let catalog = Catalog::open(config)?;
    let k = k.unwrap_or(config.top_k);

    let label = match entity {
        Entity::Book => "title",
        Entity::Author => "name",
    };
    let ranked: Vec<Value> = catalog
        .top(entity, k)
        .into_iter()
        .map(|doc| {
            json!({
                "id": doc.get(entity.id_field()),
                "rating": doc.get("rating"),
                label: doc.get(label),
            })
        })
        .collect();
    print_json(config, &ranked)
}
