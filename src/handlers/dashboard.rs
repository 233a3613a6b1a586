use axum::{extract::State, response::Response, routing::get, Router};
use std::sync::Arc;

use crate::{auth::CurrentUser, responses::success_response, AppState};

type ApiResult = Result<Response, crate::errors::ApiError>;

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Category totals and visible dealer/branch counts"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult {
    let summary = state.dashboard_service().summary(&principal).await?;
    Ok(success_response("Dashboard retrieved", summary))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(dashboard))
}
