//! Outbound email for the password-reset flow.
//!
//! Delivery is fire-and-forget from the caller's perspective: a failed send
//! is reported, but the generated OTP stays stored on the user row.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::auth::otp::OTP_TTL_MINUTES;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

/// Transport seam for outbound mail.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

/// Development sender that writes the message to the log instead of a wire.
#[derive(Debug, Default, Clone)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        info!(recipient = to, subject, "outbound email:\n{}", body);
        Ok(())
    }
}

/// Send the password-reset OTP to a user.
pub async fn send_otp_email(
    sender: &dyn EmailSender,
    email: &str,
    otp: &str,
) -> Result<(), EmailError> {
    let body = format!(
        "Hello,\n\n\
         Your OTP for password reset is: {}\n\n\
         This OTP is valid for {} minutes.\n\n\
         If you didn't request this, please ignore this email.\n\n\
         Best regards,\n\
         Dealer Management Team",
        otp, OTP_TTL_MINUTES
    );
    sender.send(email, "Password Reset OTP", &body).await
}
