//! One-time codes for the password-reset flow.
//!
//! Codes are stored on the user row and checked lazily at verification time
//! against the issuance timestamp; nothing actively evicts them.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// OTP validity window.
pub const OTP_TTL_MINUTES: i64 = 10;

const OTP_LENGTH: usize = 6;

/// Generate a random numeric code.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10)))
        .collect()
}

/// Check a candidate code against the stored one, enforcing the TTL.
pub fn is_valid(
    stored: Option<&str>,
    issued_at: Option<DateTime<Utc>>,
    candidate: &str,
    now: DateTime<Utc>,
) -> bool {
    let (Some(stored), Some(issued_at)) = (stored, issued_at) else {
        return false;
    };
    if stored != candidate {
        return false;
    }
    now <= issued_at + Duration::minutes(OTP_TTL_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_is_six_digits() {
        let code = generate();
        assert_eq!(code.len(), OTP_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn matching_code_within_ttl_is_valid() {
        let now = Utc::now();
        assert!(is_valid(
            Some("123456"),
            Some(now - Duration::minutes(9)),
            "123456",
            now
        ));
    }

    #[test]
    fn expired_code_is_rejected() {
        let now = Utc::now();
        assert!(!is_valid(
            Some("123456"),
            Some(now - Duration::minutes(11)),
            "123456",
            now
        ));
    }

    #[test]
    fn wrong_or_missing_code_is_rejected() {
        let now = Utc::now();
        assert!(!is_valid(Some("123456"), Some(now), "654321", now));
        assert!(!is_valid(None, Some(now), "123456", now));
        assert!(!is_valid(Some("123456"), None, "123456", now));
    }
}
