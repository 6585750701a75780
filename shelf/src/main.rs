//! shelf: search and edit the scraped book/author catalog.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catalog::{Config, Entity};

mod commands;

use commands::CliError;

/// Environment variable holding a tracing filter (e.g. `debug`, `catalog=trace`).
const SHELF_LOG_VAR: &str = "SHELF_LOG";

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Search and edit the book/author catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog file and default config
    Init,

    /// Search with a filter expression, e.g. 'book.rating: > 4 AND book.title:Rust'
    #[command(visible_alias = "s")]
    Search {
        /// Filter expression
        query: String,

        /// Print only the number of matches
        #[arg(short = 'c', long = "count")]
        count: bool,
    },

    /// Show the compiled form of a filter expression without running it
    Compile {
        /// Filter expression
        query: String,
    },

    /// Show one document by id
    Get {
        /// book or author
        entity: Entity,
        id: String,
    },

    /// Insert documents from a JSON file (one object or an array)
    Insert {
        /// book or author
        entity: Entity,
        file: String,
    },

    /// Update fields of a document from a JSON object file
    Update {
        /// book or author
        entity: Entity,
        id: String,
        file: String,
    },

    /// Delete a document by id
    Delete {
        /// book or author
        entity: Entity,
        id: String,
    },

    /// Merge a {"books": [...], "authors": [...]} file into the catalog
    Import { file: String },

    /// Write the catalog as a {"books": [...], "authors": [...]} file
    Export { file: String },

    /// Highest-rated documents
    Top {
        /// book or author
        entity: Entity,

        /// Number of documents (default from config)
        #[arg(short = 'k', long = "count")]
        k: Option<usize>,
    },
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_env(SHELF_LOG_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load();
    init_logging(config.as_ref().map(|c| c.log_filter.as_str()).unwrap_or("warn"));

    let result = config.map_err(CliError::from).and_then(|config| match cli.command {
        Commands::Init => commands::init(&config),
        Commands::Search { query, count } => commands::search(&config, &query, count),
        Commands::Compile { query } => commands::compile(&config, &query),
        Commands::Get { entity, id } => commands::get(&config, entity, &id),
        Commands::Insert { entity, file } => commands::insert(&config, entity, &file),
        Commands::Update { entity, id, file } => commands::update(&config, entity, &id, &file),
        Commands::Delete { entity, id } => commands::delete(&config, entity, &id),
        Commands::Import { file } => commands::import(&config, &file),
        Commands::Export { file } => commands::export(&config, &file),
        Commands::Top { entity, k } => commands::top(&config, entity, k),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
