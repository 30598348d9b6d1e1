//! Product API endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::json_body;
use crate::{
    db::ProductRepository,
    models::{CreateProductRequest, Product},
    utils::AppResult,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product))
}

async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(&state.db);
    Ok(Json(repo.list_with_associations().await?))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(&state.db);
    Ok(Json(repo.get_by_id(id).await?))
}

/// Create a product; an embedded organization or category with an `id`
/// references an existing row, one without is created alongside.
async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let payload = json_body(payload)?;
    let repo = ProductRepository::new(&state.db);
    let product = repo.create(payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}
