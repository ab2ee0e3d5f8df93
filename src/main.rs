mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod storage;
mod store;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::storage::{LinkSigner, LocalStorage, StorageProvider};
use crate::store::FileStore;

/// Multipart framing overhead allowed on top of the file size ceiling
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: FileStore,
    pub config: Arc<Config>,
    pub storage: Arc<dyn StorageProvider>,
    pub signer: LinkSigner,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filedrop=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting filedrop...");

    // Load configuration
    let config = Config::load()?;
    let config = Arc::new(config);
    tracing::info!("Configuration loaded");

    // Initialize database
    let db = Database::new(&config.database.path).await?;
    db.run_migrations().await?;
    tracing::info!("Database initialized");

    // Initialize blob storage with the link signer
    let signer = LinkSigner::new(config.app.link_secret.clone());
    let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorage::new(
        config.storage.local_path.clone(),
        config.app.base_url.clone(),
        signer.clone(),
    ));

    // Create app state
    let state = AppState {
        store: FileStore::new(db),
        config: config.clone(),
        storage,
        signer,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.app.max_file_size as usize + BODY_LIMIT_SLACK;

    let api_routes = Router::new()
        .route("/upload", post(handlers::upload::upload_file))
        .route("/download", post(handlers::download::download_file))
        .route("/file/:id", get(handlers::file::get_file_info))
        .route("/file/:id/preview", get(handlers::file::preview_file));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/blob/*path", get(handlers::blob::serve_blob))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
