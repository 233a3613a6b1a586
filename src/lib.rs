//! DealerDesk API: dealer network and inventory management backend.
//!
//! The crate is layered: entities (sea-orm models) at the bottom, access
//! scoping and domain services above them, and a thin axum handler layer on
//! top. Handlers never touch the database directly; every read and write
//! goes through a service carrying the request principal.

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod notifications;
pub mod openapi;
pub mod pagination;
pub mod responses;
pub mod scope;
pub mod services;

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::AuthService,
    config::AppConfig,
    db::DbPool,
    notifications::{EmailSender, LogEmailSender},
    services::{
        accounts::AccountService, branches::BranchService, dashboard::DashboardService,
        dealers::DealerService, roles::RoleService, supplies::SupplyService,
    },
};

/// Shared application state handed to every handler.
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub auth: Arc<AuthService>,
    pub mailer: Arc<dyn EmailSender>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Self {
        let auth = Arc::new(AuthService::new(config.auth.clone()));
        Self {
            db,
            config,
            auth,
            mailer: Arc::new(LogEmailSender),
        }
    }

    pub fn account_service(&self) -> AccountService {
        AccountService::new(self.db.clone(), self.auth.clone(), self.mailer.clone())
    }

    pub fn role_service(&self) -> RoleService {
        RoleService::new(self.db.clone())
    }

    pub fn branch_service(&self) -> BranchService {
        BranchService::new(self.db.clone())
    }

    pub fn dealer_service(&self) -> DealerService {
        DealerService::new(self.db.clone(), self.auth.clone())
    }

    pub fn supply_service(&self) -> SupplyService {
        SupplyService::new(self.db.clone())
    }

    pub fn dashboard_service(&self) -> DashboardService {
        DashboardService::new(self.db.clone())
    }
}

/// Builds the full application router: versioned API, health endpoint and
/// Swagger UI, with tracing and CORS layers applied.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", handlers::api_router())
        .merge(handlers::health::routes())
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
