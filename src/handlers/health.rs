use axum::{extract::State, response::Response, routing::get, Router};
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{responses::success_response, AppState};

type ApiResult = Result<Response, crate::errors::ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service liveness and database reachability")),
    tag = "health"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> ApiResult {
    let database = match state
        .db
        .execute(Statement::from_string(
            state.db.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await
    {
        Ok(_) => "up",
        Err(_) => "down",
    };

    Ok(success_response(
        "Service healthy",
        HealthStatus {
            status: "ok",
            database,
            version: env!("CARGO_PKG_VERSION"),
        },
    ))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
