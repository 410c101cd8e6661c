pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod schemas;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Build the application router. Everything under the protected router
/// requires a valid bearer token.
pub fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Auth routes
        .route("/api/auth/me", get(routes::auth::me))
        // Deck routes
        .route("/api/decks", get(routes::decks::list))
        .route("/api/decks", post(routes::decks::create))
        .route("/api/decks/:id", get(routes::decks::get))
        .route("/api/decks/:id", put(routes::decks::update))
        .route("/api/decks/:id", delete(routes::decks::delete))
        .route("/api/decks/:id/cards", get(routes::decks::cards))
        // Card routes
        .route("/api/cards", post(routes::cards::create))
        .route("/api/cards/:id", put(routes::cards::update))
        .route("/api/cards/:id", delete(routes::cards::delete))
        // Study routes
        .route("/api/study/progress", post(routes::study::record_progress))
        // Dashboard routes
        .route("/api/dashboard/stats", get(routes::dashboard::stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .merge(protected_routes)
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to database
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState { db: Arc::new(db) };

    let app = app(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
