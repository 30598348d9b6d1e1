//! Product Catalog Library
//!
//! Products, categories and organizations kept in SQLite and served over a
//! JSON REST API and a SOAP endpoint.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod soap;
pub mod utils;

use axum::Router;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub use config::AppConfig;
pub use db::DbPool;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: DbPool,
}

/// Build the application router: REST under `/api`, SOAP under the
/// configured path.
pub fn create_router(state: AppState) -> Router {
    let soap_path = state.config.soap.path.clone();
    let cors = if state.config.server.cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .nest("/api", api::routes())
        .nest(&soap_path, soap::routes())
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
}
