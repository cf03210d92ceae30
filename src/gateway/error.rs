//! Gateway error taxonomy.

use thiserror::Error;

use crate::model::{ImageError, ProviderError};

/// HTTP status of a rate-limited call.
const TOO_MANY_REQUESTS: u16 = 429;

/// Case-sensitive status string the provider puts in quota error bodies.
const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// Lowercase markers matched case-insensitively.
const RATE_LIMIT_PHRASES: &[&str] = &["quota", "rate limit"];

/// Failure of a gateway operation.
///
/// Every variant is terminal for the action that triggered it; the gateway
/// never retries on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The provider refused the call because of rate or quota exhaustion.
    #[error("Rate limit reached")]
    RateLimited,
    /// No candidate model identifier could be initialized.
    #[error("No model is currently available")]
    Unavailable,
    /// Any other provider-side failure, message preserved verbatim.
    #[error("{message}")]
    Unknown { message: String },
}

impl GatewayError {
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }
}

/// Whether an API error body describes rate or quota exhaustion.
///
/// Bare digits are not matched here; the HTTP status is checked separately.
pub fn is_rate_limit_body(body: &str) -> bool {
    if body.contains(RESOURCE_EXHAUSTED) {
        return true;
    }
    let lower = body.to_lowercase();
    RATE_LIMIT_PHRASES.iter().any(|p| lower.contains(p))
}

/// Whether an unstructured error text signals rate or quota exhaustion.
///
/// Used for errors that carry no HTTP status, so a literal `429` counts.
pub fn is_rate_limit_message(message: &str) -> bool {
    message.contains("429") || is_rate_limit_body(message)
}

impl From<ProviderError> for GatewayError {
    fn from(err: ProviderError) -> Self {
        let rate_limited = match &err {
            ProviderError::Api { status, body } => {
                *status == TOO_MANY_REQUESTS || is_rate_limit_body(body)
            }
            other => is_rate_limit_message(&other.to_string()),
        };
        let message = err.to_string();
        if rate_limited {
            GatewayError::RateLimited
        } else {
            GatewayError::Unknown { message }
        }
    }
}

impl From<ImageError> for GatewayError {
    fn from(err: ImageError) -> Self {
        GatewayError::unknown(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_markers() {
        assert!(is_rate_limit_message("429: Too Many Requests"));
        assert!(is_rate_limit_message(
            r#"{"error": {"code": 429, "status": "RESOURCE_EXHAUSTED"}}"#
        ));
        assert!(is_rate_limit_message("You exceeded your current Quota"));
        assert!(is_rate_limit_message("Rate limit exceeded for model"));
        assert!(!is_rate_limit_message("400: API key not valid"));
    }

    #[test]
    fn test_digits_in_body_are_not_a_status() {
        let err = ProviderError::Api {
            status: 400,
            body: concat!(
                r#"{"error": {"message": "Unexpected token at position 1429", "#,
                r#""status": "INVALID_ARGUMENT"}}"#
            )
            .to_string(),
        };
        let message = err.to_string();
        assert_eq!(GatewayError::from(err), GatewayError::Unknown { message });
    }

    #[test]
    fn test_quota_body_without_429_status() {
        let err = ProviderError::Api {
            status: 403,
            body: r#"{"error": {"status": "RESOURCE_EXHAUSTED"}}"#.to_string(),
        };
        assert_eq!(GatewayError::from(err), GatewayError::RateLimited);
        assert!(!is_rate_limit_body("request 4291 failed"));
    }

    #[test]
    fn test_provider_error_classification() {
        let limited = ProviderError::Api {
            status: 429,
            body: "slow down".to_string(),
        };
        assert_eq!(GatewayError::from(limited), GatewayError::RateLimited);

        let other = ProviderError::Api {
            status: 400,
            body: "Unsupported MIME type".to_string(),
        };
        assert_eq!(
            GatewayError::from(other),
            GatewayError::unknown("400: Unsupported MIME type")
        );
    }
}
