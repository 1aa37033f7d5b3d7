//! Todo feed API server binary.
//!
//! This binary opens the concrete store and passes it to the API server.
//! The API layer remains agnostic of the storage backend.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use todo_feed::api::{self, ApiError, Config, StoreBackend};
use todo_feed::db::{DbError, JsonFileStore, SqliteStore};
use tracing::info;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(todo_feed::binary::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(todo_feed::binary::io))]
    Io(#[from] std::io::Error),

    #[error("API server error: {0}")]
    #[diagnostic(code(todo_feed::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "todo-api")]
#[command(author, version, about = "Todo feed API server", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Storage backend (defaults to TODO_FEED_STORE or json)
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,

    /// Store file path (defaults to TODO_FEED_DB or the XDG data directory)
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    run().await?;
    Ok(())
}

async fn run() -> Result<(), BinaryError> {
    let cli = Cli::parse();
    api::init_tracing();

    let mut config = Config::new()?.with_host(cli.host).with_port(cli.port);
    if let Some(store) = cli.store {
        config = config.with_backend(store);
    }
    if let Some(db) = cli.db {
        config = config.with_db_path(db);
    }

    let db_path = config.store.path();
    info!(backend = %config.store.backend, path = ?db_path, "Opening store");

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Pass the concrete store to the generic API layer
    match config.store.backend {
        StoreBackend::Json => {
            let store = JsonFileStore::open(&db_path).await?;
            api::run(config, store).await?;
        }
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(&db_path).await?;

            // Run migrations before starting the server
            store.migrate().await?;
            api::run(config, store).await?;
        }
    }

    Ok(())
}
