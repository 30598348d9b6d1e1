//! REST API routes and handlers
//!
//! JSON endpoints for organizations, categories and products, nested under
//! `/api` by the application router.

use axum::{extract::rejection::JsonRejection, routing::get, Json, Router};

use crate::utils::{AppError, AppResult};
use crate::AppState;

mod categories;
mod health;
mod organizations;
mod products;

pub use health::*;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/detailed", get(health::health_check_detailed))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/organizations", organizations::routes())
        .nest("/categories", categories::routes())
        .nest("/products", products::routes())
}

/// Unwrap a JSON body, reporting malformed input in the common error shape
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}
