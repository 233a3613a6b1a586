//! Account lifecycle: login, token refresh, staff signup and the
//! OTP-based password-reset flow.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    auth::{otp, AuthService, TokenPair},
    db::DbPool,
    entities::user,
    errors::ServiceError,
    notifications::{send_otp_email, EmailSender},
};

/// Public shape of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub must_change_password: bool,
    pub role_id: Option<i64>,
    pub branch_id: Option<i64>,
}

impl From<user::Model> for UserInfo {
    fn from(account: user::Model) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            must_change_password: account.must_change_password,
            role_id: account.role_id,
            branch_id: account.branch_id,
        }
    }
}

/// Successful login/refresh/signup payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPayload {
    pub tokens: TokenPair,
    pub user: UserInfo,
}

/// Fields accepted on staff signup.
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: Option<i64>,
    pub branch_id: Option<i64>,
}

/// Service for account authentication and self-service password reset.
#[derive(Clone)]
pub struct AccountService {
    db: Arc<DbPool>,
    auth: Arc<AuthService>,
    mailer: Arc<dyn EmailSender>,
}

impl AccountService {
    pub fn new(db: Arc<DbPool>, auth: Arc<AuthService>, mailer: Arc<dyn EmailSender>) -> Self {
        Self { db, auth, mailer }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?)
    }

    /// Authenticates a username/password pair and issues a token pair.
    ///
    /// A missing account and a wrong password are indistinguishable to the
    /// caller; an inactive account is reported as such.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthPayload, ServiceError> {
        let account = self
            .find_by_username(username)
            .await?
            .filter(|account| self.auth.verify_password(password, &account.password_hash))
            .ok_or_else(|| {
                ServiceError::Unauthorized("Invalid username or password".to_string())
            })?;

        if !account.is_active {
            return Err(ServiceError::Forbidden(
                "This account has been deactivated".to_string(),
            ));
        }

        let tokens = self.auth.issue_token_pair(account.id)?;
        info!(user_id = account.id, "login succeeded");
        Ok(AuthPayload {
            tokens,
            user: account.into(),
        })
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthPayload, ServiceError> {
        let user_id = self
            .auth
            .verify_refresh_token(refresh_token)
            .map_err(|_| ServiceError::Unauthorized("Invalid refresh token".to_string()))?;

        let account = user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?
            .filter(|account| account.is_active)
            .ok_or_else(|| ServiceError::Unauthorized("Invalid refresh token".to_string()))?;

        let tokens = self.auth.issue_token_pair(account.id)?;
        Ok(AuthPayload {
            tokens,
            user: account.into(),
        })
    }

    /// Registers a staff account and logs it in.
    #[instrument(skip(self, input))]
    pub async fn signup(&self, input: SignupInput) -> Result<AuthPayload, ServiceError> {
        let taken = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(input.username.clone()))
                    .add(user::Column::Email.eq(input.email.clone())),
            )
            .one(self.db.as_ref())
            .await?
            .is_some();
        if taken {
            return Err(ServiceError::Conflict(
                "A user with this username or email already exists".to_string(),
            ));
        }

        let password_hash = self.auth.hash_password(&input.password)?;
        let account = user::ActiveModel {
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(password_hash),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            is_staff: Set(true),
            is_superuser: Set(false),
            is_active: Set(true),
            must_change_password: Set(false),
            role_id: Set(input.role_id),
            branch_id: Set(input.branch_id),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        info!(user_id = account.id, "staff account created");
        let tokens = self.auth.issue_token_pair(account.id)?;
        Ok(AuthPayload {
            tokens,
            user: account.into(),
        })
    }

    /// Generates an OTP for the account behind `email` and mails it.
    ///
    /// The code is persisted before the send is attempted, so a delivery
    /// failure leaves a working code behind for a retry.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), ServiceError> {
        let account = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| account_not_found(email))?;

        let code = otp::generate();
        let mut model: user::ActiveModel = account.clone().into();
        model.otp = Set(Some(code.clone()));
        model.otp_created_at = Set(Some(Utc::now()));
        model.update(self.db.as_ref()).await?;

        if let Err(err) = send_otp_email(self.mailer.as_ref(), &account.email, &code).await {
            warn!(user_id = account.id, error = %err, "OTP email delivery failed");
            return Err(ServiceError::Email(err.to_string()));
        }
        info!(user_id = account.id, "password reset OTP issued");
        Ok(())
    }

    /// Checks an OTP without consuming it.
    #[instrument(skip(self, code))]
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<(), ServiceError> {
        let account = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| account_not_found(email))?;

        if !otp::is_valid(
            account.otp.as_deref(),
            account.otp_created_at,
            code,
            Utc::now(),
        ) {
            return Err(ServiceError::Validation(
                "Invalid or expired OTP".to_string(),
            ));
        }
        Ok(())
    }

    /// Consumes a valid OTP and sets a new password.
    #[instrument(skip(self, code, new_password))]
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let account = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| account_not_found(email))?;

        if !otp::is_valid(
            account.otp.as_deref(),
            account.otp_created_at,
            code,
            Utc::now(),
        ) {
            return Err(ServiceError::Validation(
                "Invalid or expired OTP".to_string(),
            ));
        }

        let password_hash = self.auth.hash_password(new_password)?;
        let user_id = account.id;
        let mut model: user::ActiveModel = account.into();
        model.password_hash = Set(password_hash);
        model.otp = Set(None);
        model.otp_created_at = Set(None);
        model.must_change_password = Set(false);
        model.update(self.db.as_ref()).await?;

        info!(user_id, "password reset completed");
        Ok(())
    }

}

fn account_not_found(email: &str) -> ServiceError {
    ServiceError::NotFound(format!("No account found for email '{}'", email))
}
