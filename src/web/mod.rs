mod pages;
mod routes;

pub use routes::GenerateRequest;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::llm::PerplexityClient;
use crate::platforms::PlatformManager;
use crate::workspace::Workspace;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub llm: PerplexityClient,
    pub platforms: Arc<RwLock<PlatformManager>>,
    pub workspace: Arc<RwLock<Workspace>>,
}

impl AppState {
    /// Build state with the standard platform backends.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let http = config
            .http_client()
            .context("Failed to build HTTP client")?;
        let llm = PerplexityClient::new(&config, http.clone());
        let platforms = PlatformManager::from_config(&config, &http);

        Ok(Self {
            db,
            config: Arc::new(config),
            llm,
            platforms: Arc::new(RwLock::new(platforms)),
            workspace: Arc::new(RwLock::new(Workspace::default())),
        })
    }
}

/// Start the web server and run until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve<F>(config: Config, db: Database, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let state = AppState::new(config, db)?;
    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
