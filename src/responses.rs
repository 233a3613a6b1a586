//! Uniform response envelope.
//!
//! Every endpoint answers `{status: bool, message, data}`; list endpoints add
//! a `pagination` block and failures an `error` block (see `errors.rs`).
//! Exactly one of `data`/`error` is populated per response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::pagination::PageMeta;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    pub status: bool,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub status: bool,
    pub message: String,
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

/// 200 with the standard envelope.
pub fn success_response<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse {
            status: true,
            message: message.into(),
            data: Some(data),
        }),
    )
        .into_response()
}

/// 201 with the standard envelope.
pub fn created_response<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            status: true,
            message: message.into(),
            data: Some(data),
        }),
    )
        .into_response()
}

/// 200 with no payload (deletes, password updates).
pub fn message_response(message: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse::<serde_json::Value> {
            status: true,
            message: message.into(),
            data: None,
        }),
    )
        .into_response()
}

/// 200 with items plus the pagination metadata block.
pub fn paginated_response<T: Serialize>(
    message: impl Into<String>,
    data: Vec<T>,
    pagination: PageMeta,
) -> Response {
    (
        StatusCode::OK,
        Json(PaginatedResponse {
            status: true,
            message: message.into(),
            data,
            pagination,
        }),
    )
        .into_response()
}
