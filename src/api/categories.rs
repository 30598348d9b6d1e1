//! Category API endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::json_body;
use crate::{
    db::{CategoryRepository, ProductRepository},
    models::{Category, CreateCategoryRequest, Product},
    utils::{AppError, AppResult},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/{id}", get(get_category))
        .route("/{id}/products", get(list_category_products))
}

async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(&state.db);
    Ok(Json(repo.list().await?))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(&state.db);
    repo.get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("category with id {id} not found")))
}

/// Products of one category, each with its full aggregate
async fn list_category_products(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(&state.db);
    Ok(Json(repo.list_by_category(id).await?))
}

async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let payload = json_body(payload)?;
    let repo = CategoryRepository::new(&state.db);
    let category = repo.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(category)))
}
