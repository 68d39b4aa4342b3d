use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imposter::{api, catalog::Catalog, config::ServerConfig, handoff::HandoffStore, state::AppState, ws};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imposter=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting imposter setup server...");

    let config = ServerConfig::from_env();

    // Load the word catalog before binding; falls back to built-in data on
    // any failure, so this never aborts startup.
    let catalog = Catalog::load(&config.catalog_source()).await;
    tracing::info!(
        origin = catalog.origin().as_str(),
        categories = catalog.len(),
        "word catalog ready"
    );

    let handoff = HandoffStore::new(&config.handoff_path);
    let state = Arc::new(AppState::new(catalog, handoff));

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/handoff", get(api::get_handoff))
        .route("/api/categories", get(api::list_categories))
        .route("/api/status", get(api::status))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
