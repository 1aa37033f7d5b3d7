//! HTTP API for the todo feed.
//!
//! The server is generic over `TodoStore`; the binary picks the backend once
//! at start-up and hands the concrete store in.

pub mod routes;
mod state;
pub mod v1;


use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::TodoStore;
use crate::paths::{get_json_path, get_sqlite_path};

pub use state::AppState;

/// Environment variable selecting the storage backend.
pub const STORE_ENV: &str = "TODO_FEED_STORE";

/// Environment variable overriding the backend file path.
pub const DB_PATH_ENV: &str = "TODO_FEED_DB";

/// Errors that stop the API server from starting or serving.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Server I/O error: {0}")]
    #[diagnostic(code(todo_feed::api::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid value {value:?} for {name}")]
    #[diagnostic(
        code(todo_feed::api::config),
        help("Supported storage backends are `json` and `sqlite`")
    )]
    InvalidConfig { name: String, value: String },
}

/// Storage backend behind the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StoreBackend {
    /// Single JSON document on disk
    #[default]
    Json,
    /// SQLite database with embedded migrations
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(ApiError::InvalidConfig {
                name: STORE_ENV.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Which backend to open and where its file lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Explicit file path; `None` means the XDG default for the backend.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Resolve the file the backend should open.
    pub fn path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| match self.backend {
            StoreBackend::Json => get_json_path(),
            StoreBackend::Sqlite => get_sqlite_path(),
        })
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Storage backend selection
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Create config from defaults overlaid with environment variables.
    ///
    /// Reads `TODO_FEED_STORE` and `TODO_FEED_DB`. Empty values are ignored.
    pub fn new() -> Result<Self, ApiError> {
        let mut config = Self::default();

        if let Some(raw) = env::var(STORE_ENV).ok().filter(|v| !v.trim().is_empty()) {
            config.store.backend = raw.parse()?;
        }
        if let Some(path) = env::var_os(DB_PATH_ENV).filter(|v| !v.is_empty()) {
            config.store.path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the storage backend (CLI flag takes precedence over env).
    pub fn with_backend(mut self, backend: StoreBackend) -> Self {
        self.store.backend = backend;
        self
    }

    /// Override the backend file path (CLI flag takes precedence over env).
    pub fn with_db_path(mut self, path: PathBuf) -> Self {
        self.store.path = Some(path);
        self
    }
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_feed=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the API server with the given configuration and store
pub async fn run<S: TodoStore + 'static>(config: Config, store: S) -> Result<(), ApiError> {
    let state = AppState::new(store);
    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(backend = %config.store.backend, "API server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
