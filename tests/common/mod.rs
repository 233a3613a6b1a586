//! Test harness: in-memory SQLite application with seeded accounts.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use dealerdesk_api::{
    app_router,
    config::{AppConfig, AuthSettings},
    db,
    entities::user,
    AppState,
};

pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
    pub admin_id: i64,
    pub admin_token: String,
    pub staff_id: i64,
    pub staff_token: String,
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "warn".to_string(),
        log_json: false,
        auto_migrate: false,
        auth: AuthSettings::default(),
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(true).await
    }

    /// Application with `auth.enabled = false`: every request runs as the
    /// superuser-equivalent system principal.
    pub async fn new_with_auth_disabled() -> Self {
        Self::build(false).await
    }

    async fn build(auth_enabled: bool) -> Self {
        // A single connection keeps every query on the same in-memory
        // database.
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1);
        let pool = Database::connect(options)
            .await
            .expect("failed to open test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let mut config = test_config();
        config.auth.enabled = auth_enabled;
        let state = Arc::new(AppState::new(Arc::new(pool), config));
        let router = app_router(state.clone());

        let admin_id = seed_user(&state, "admin", "admin@example.com", "admin-pass", true).await;
        let staff_id = seed_user(&state, "staff", "staff@example.com", "staff-pass", false).await;
        let admin_token = token_for(&state, admin_id);
        let staff_token = token_for(&state, staff_id);

        Self {
            router,
            state,
            admin_id,
            admin_token,
            staff_id,
            staff_token,
        }
    }

    /// Send a request, returning the status and decoded JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).expect("failed to serialize request body"))
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("failed to build request"))
            .await
            .expect("router error during test request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read response body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body was not JSON")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Create a branch through the API and return its id.
    pub async fn seed_branch(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self
            .post("/api/v1/branches", token, json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed_branch failed: {body}");
        body["data"]["id"].as_i64().expect("branch id missing")
    }

    /// Create a dealer through the API and return its id.
    pub async fn seed_dealer(&self, token: &str, name: &str, mobile: &str, branch_id: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/dealers",
                token,
                json!({
                    "name": name,
                    "mobile_number": mobile,
                    "address_line1": "12 Market Road",
                    "branch_id": branch_id
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed_dealer failed: {body}");
        body["data"]["id"].as_i64().expect("dealer id missing")
    }

    /// Create one supply record through the API and return its id.
    pub async fn seed_supply(
        &self,
        token: &str,
        dealer_id: i64,
        product_name: &str,
        serial: &str,
        count: i32,
    ) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/supplies",
                token,
                json!({
                    "dealer_id": dealer_id,
                    "product_name": product_name,
                    "invoice_number": format!("INV-{serial}"),
                    "serial_number": serial,
                    "count": count
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed_supply failed: {body}");
        body["data"]["id"].as_i64().expect("supply id missing")
    }

    /// Login and return the access token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["tokens"]["access"]
            .as_str()
            .expect("access token missing")
            .to_string()
    }
}

async fn seed_user(
    state: &Arc<AppState>,
    username: &str,
    email: &str,
    password: &str,
    is_superuser: bool,
) -> i64 {
    let password_hash = state
        .auth
        .hash_password(password)
        .expect("failed to hash seed password");
    let account = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        is_staff: Set(true),
        is_superuser: Set(is_superuser),
        is_active: Set(true),
        must_change_password: Set(false),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .expect("failed to seed user");
    account.id
}

pub fn token_for(state: &Arc<AppState>, user_id: i64) -> String {
    state
        .auth
        .issue_token_pair(user_id)
        .expect("failed to issue test token")
        .access
}
