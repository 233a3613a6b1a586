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
pub struct RoleRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/roles",
    params(PageParams),
    responses(
        (status = 200, description = "Roles listed"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<PageParams>,
) -> ApiResult {
    let (items, meta) = state
        .role_service()
        .list(&principal, &params, uri.path())
        .await?;
    Ok(paginated_response("Roles retrieved", items, meta))
}

#[utoipa::path(
    get,
    path = "/api/v1/roles/:id",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role fetched"),
        (status = 404, description = "Role not found", body = crate::errors::ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn get_role(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult {
    let role = state.role_service().get(&principal, id).await?;
    Ok(success_response("Role retrieved", role))
}

#[utoipa::path(
    post,
    path = "/api/v1/roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created"),
        (status = 409, description = "Role name already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn create_role(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Json(payload): Json<RoleRequest>,
) -> ApiResult {
    validate_input(&payload)?;
    let role = state.role_service().create(&principal, payload.name).await?;
    Ok(created_response("Role created", role))
}

#[utoipa::path(
    put,
    path = "/api/v1/roles/:id",
    request_body = RoleRequest,
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role updated"),
        (status = 404, description = "Role not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Role name already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn update_role(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult {
    validate_input(&payload)?;
    let role = state
        .role_service()
        .update(&principal, id, payload.name)
        .await?;
    Ok(success_response("Role updated", role))
}

#[utoipa::path(
    delete,
    path = "/api/v1/roles/:id",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role deleted"),
        (status = 404, description = "Role not found", body = crate::errors::ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn delete_role(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult {
    state.role_service().delete(&principal, id).await?;
    Ok(message_response("Role deleted"))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/roles", get(list_roles).post(create_role))
        .route("/roles/:id", get(get_role).put(update_role).delete(delete_role))
}
