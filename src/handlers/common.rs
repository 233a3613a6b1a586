//! Shared request plumbing for the HTTP layer.

use validator::Validate;

use crate::errors::ApiError;

/// Run derive-based validation on a request body, mapping failures into the
/// standard validation error envelope.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))
}
