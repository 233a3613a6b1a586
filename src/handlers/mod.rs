//! HTTP layer: one module per resource, each exposing a `routes()` router
//! merged under `/api/v1`.

pub mod auth;
pub mod branches;
pub mod common;
pub mod dashboard;
pub mod dealers;
pub mod health;
pub mod roles;
pub mod supplies;

use axum::Router;
use std::sync::Arc;

use crate::AppState;

/// All resource routes, to be nested under the API prefix.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(auth::routes())
        .merge(roles::routes())
        .merge(branches::routes())
        .merge(dealers::routes())
        .merge(supplies::routes())
        .merge(dashboard::routes())
}
