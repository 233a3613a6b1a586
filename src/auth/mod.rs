//! Authentication: JWT access/refresh tokens, argon2 password hashing, and
//! the `CurrentUser` extractor that resolves the request principal.
//!
//! The principal is resolved per request from the access token's `sub` claim
//! by loading the user row, mirroring the scoping rules in [`crate::scope`].
//! When authentication is disabled by configuration the extractor yields the
//! superuser-equivalent system principal instead of touching the header.

pub mod otp;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::AuthSettings,
    entities::{dealer, user},
    errors::{ApiError, ServiceError},
    scope::Principal,
    AppState,
};

const TOKEN_USE_ACCESS: &str = "access";
const TOKEN_USE_REFRESH: &str = "refresh";

/// Claim structure for both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: String,
    /// Unique token id
    pub jti: String,
    /// "access" or "refresh"
    pub token_use: String,
    pub iat: i64,
    pub exp: i64,
}

/// Access + refresh token pair returned by login/refresh/signup.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// Token issuing, verification and credential hashing.
#[derive(Clone)]
pub struct AuthService {
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(settings: AuthSettings) -> Self {
        Self { settings }
    }

    pub fn enabled(&self) -> bool {
        self.settings.enabled
    }

    fn encode_token(&self, user_id: i64, token_use: &str, ttl_secs: u64) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_use: token_use.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs as i64)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("token encoding failed: {}", e)))
    }

    /// Issue a fresh access/refresh pair for a user.
    pub fn issue_token_pair(&self, user_id: i64) -> Result<TokenPair, ServiceError> {
        Ok(TokenPair {
            access: self.encode_token(user_id, TOKEN_USE_ACCESS, self.settings.jwt_expiration_secs)?,
            refresh: self.encode_token(
                user_id,
                TOKEN_USE_REFRESH,
                self.settings.refresh_expiration_secs,
            )?,
            expires_in: self.settings.jwt_expiration_secs as i64,
            token_type: "bearer".to_string(),
        })
    }

    fn decode_token(&self, token: &str, expected_use: &str) -> Result<i64, ApiError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| ApiError::InvalidToken)?;

        if data.claims.token_use != expected_use {
            return Err(ApiError::InvalidToken);
        }
        data.claims.sub.parse().map_err(|_| ApiError::InvalidToken)
    }

    /// Verify an access token and return the embedded user id.
    pub fn verify_access_token(&self, token: &str) -> Result<i64, ApiError> {
        self.decode_token(token, TOKEN_USE_ACCESS)
    }

    /// Verify a refresh token and return the embedded user id.
    pub fn verify_refresh_token(&self, token: &str) -> Result<i64, ApiError> {
        self.decode_token(token, TOKEN_USE_REFRESH)
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {}", e)))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

/// Resolve a principal for a user account, looking up the linked dealer
/// profile for non-staff logins.
pub async fn resolve_principal(
    db: &sea_orm::DatabaseConnection,
    account: &user::Model,
) -> Result<Principal, ServiceError> {
    let dealer_id = if account.is_superuser || account.is_staff {
        None
    } else {
        dealer::Entity::find()
            .filter(dealer::Column::UserId.eq(account.id))
            .one(db)
            .await?
            .map(|d| d.id)
    };
    Ok(Principal::from_parts(account, dealer_id))
}

/// Extractor for the authenticated principal on protected routes.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if !state.auth.enabled() {
            return Ok(CurrentUser(Principal::system()));
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let user_id = state.auth.verify_access_token(token)?;

        let account = user::Entity::find_by_id(user_id)
            .one(state.db.as_ref())
            .await
            .map_err(ServiceError::from)?
            .filter(|account| account.is_active)
            .ok_or(ApiError::InvalidToken)?;

        let principal = resolve_principal(state.db.as_ref(), &account).await?;
        Ok(CurrentUser(principal))
    }
}
