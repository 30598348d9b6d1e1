//! Organization API endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::json_body;
use crate::{
    db::OrganizationRepository,
    models::{CreateOrganizationRequest, Organization},
    utils::{AppError, AppResult},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organizations).post(create_organization))
        .route("/{id}", get(get_organization))
}

async fn list_organizations(State(state): State<AppState>) -> AppResult<Json<Vec<Organization>>> {
    let repo = OrganizationRepository::new(&state.db);
    Ok(Json(repo.list().await?))
}

async fn get_organization(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Organization>> {
    let repo = OrganizationRepository::new(&state.db);
    match repo.get_by_id(id).await? {
        Some(org) => Ok(Json(org)),
        None => Err(AppError::not_found(format!("organization with id {id} not found"))),
    }
}

async fn create_organization(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrganizationRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Organization>)> {
    let payload = json_body(payload)?;
    let repo = OrganizationRepository::new(&state.db);
    let org = repo.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(org)))
}
