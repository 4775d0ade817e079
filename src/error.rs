use std::time::Duration;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::models::ApiErrorBody;

/// Every runtime failure of the client is normalized into this one type so
/// callers have a single handling path. Configuration failures are separate
/// (`config::ConfigError`): they happen once at startup and abort it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Local input failed its schema constraints before any network call.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// The deadline elapsed before the server responded.
    #[error(
        "Request timeout after {} seconds - The server is taking longer than expected to process your request",
        .timeout.as_secs_f64()
    )]
    Timeout { timeout: Duration },

    /// The server answered with a non-2xx status.
    #[error("{detail}")]
    Http {
        status: u16,
        detail: String,
        body: Option<ApiErrorBody>,
    },

    /// Transport-level failure: no response at all.
    #[error("Network error - Please check your connection and try again")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    /// A response arrived but did not match the expected schema. Distinct
    /// from `Http`: it signals backend/client contract drift and must never
    /// be silently swallowed.
    #[error("response validation failed: {reason}")]
    ResponseValidation { reason: String },
}

impl ApiError {
    /// Numeric status carried by this error, if any: the HTTP code for
    /// server failures, 408 for an elapsed deadline, 0 for transport
    /// failures. Local and response validation carry none.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation(_) | ApiError::ResponseValidation { .. } => None,
            ApiError::Timeout { .. } => Some(408),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network { .. } => Some(0),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }
}

/// Builds a single-field `Validation` error for input checks that are not
/// expressed as derive attributes (e.g. upload file guards).
pub fn input_validation_error(field: &'static str, code: &'static str, message: String) -> ApiError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add(field.into(), error);
    ApiError::Validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_states_configured_seconds() {
        let err = ApiError::Timeout {
            timeout: Duration::from_millis(50),
        };
        let message = err.to_string();
        assert!(message.contains("0.05"), "unexpected message: {}", message);
        assert_eq!(err.status(), Some(408));
    }

    #[tokio::test]
    async fn network_error_has_status_zero() {
        // reqwest::Error cannot be constructed directly; go through a
        // guaranteed-unreachable request instead.
        let source = reqwest::get("http://127.0.0.1:0/").await.unwrap_err();
        let err = ApiError::Network { source };
        assert_eq!(err.status(), Some(0));
        assert!(err.to_string().contains("check your connection"));
    }

    #[test]
    fn local_validation_carries_no_status() {
        let err = input_validation_error("files", "empty", "No files provided".to_string());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("invalid input"));
    }
}
