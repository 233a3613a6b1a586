use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    auth::CurrentUser,
    handlers::common::validate_input,
    pagination::PageParams,
    responses::{created_response, message_response, paginated_response, success_response},
    AppState,
};

type ApiResult = Result<Response, crate::errors::ApiError>;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BranchRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    pub address: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/branches",
    params(PageParams),
    responses(
        (status = 200, description = "Branches listed"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "branches"
)]
pub async fn list_branches(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<PageParams>,
) -> ApiResult {
    let (items, meta) = state
        .branch_service()
        .list(&principal, &params, uri.path())
        .await?;
    Ok(paginated_response("Branches retrieved", items, meta))
}

#[utoipa::path(
    get,
    path = "/api/v1/branches/:id",
    params(("id" = i64, Path, description = "Branch id")),
    responses(
        (status = 200, description = "Branch fetched"),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "branches"
)]
pub async fn get_branch(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult {
    let branch = state.branch_service().get(&principal, id).await?;
    Ok(success_response("Branch retrieved", branch))
}

#[utoipa::path(
    post,
    path = "/api/v1/branches",
    request_body = BranchRequest,
    responses(
        (status = 201, description = "Branch created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "branches"
)]
pub async fn create_branch(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Json(payload): Json<BranchRequest>,
) -> ApiResult {
    validate_input(&payload)?;
    let branch = state
        .branch_service()
        .create(&principal, payload.name, payload.address)
        .await?;
    Ok(created_response("Branch created", branch))
}

#[utoipa::path(
    put,
    path = "/api/v1/branches/:id",
    request_body = BranchRequest,
    params(("id" = i64, Path, description = "Branch id")),
    responses(
        (status = 200, description = "Branch updated"),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "branches"
)]
pub async fn update_branch(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<BranchRequest>,
) -> ApiResult {
    validate_input(&payload)?;
    let branch = state
        .branch_service()
        .update(&principal, id, payload.name, payload.address)
        .await?;
    Ok(success_response("Branch updated", branch))
}

#[utoipa::path(
    delete,
    path = "/api/v1/branches/:id",
    params(("id" = i64, Path, description = "Branch id")),
    responses(
        (status = 200, description = "Branch deleted with its dealers and their supplies"),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "branches"
)]
pub async fn delete_branch(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult {
    state.branch_service().delete(&principal, id).await?;
    Ok(message_response("Branch deleted"))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/branches", get(list_branches).post(create_branch))
        .route(
            "/branches/:id",
            get(get_branch).put(update_branch).delete(delete_branch),
        )
}
