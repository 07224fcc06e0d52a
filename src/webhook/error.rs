//! Typed errors for webhook delivery
//!
//! Structured variants so the caller can log failure modes meaningfully
//! without string matching. Delivery is never retried automatically; the
//! retryability predicate only informs logging and the operator.

use thiserror::Error;

/// Webhook delivery errors with typed variants
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The webhook id/token pair was rejected (HTTP 401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded (HTTP 429)
    ///
    /// The inner string may contain the retry-after detail Discord returns.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Discord rejected the payload (HTTP 400)
    ///
    /// Indicates a bug in payload assembly or an attachment Discord refuses.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Server-side error (HTTP 5xx)
    #[error("Service error: {0}")]
    ServiceError(String),

    /// Network connectivity issue (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Other errors not fitting the above categories
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl WebhookError {
    /// Whether a manual resubmission has a chance of succeeding unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::RateLimited(_) | WebhookError::ServiceError(_) | WebhookError::Network(_)
        )
    }

    /// Convert HTTP status code and error body into a typed error
    pub fn from_http_status(status: reqwest::StatusCode, error_text: String) -> Self {
        match status.as_u16() {
            401 | 403 => WebhookError::Unauthorized(error_text),
            429 => WebhookError::RateLimited(error_text),
            400 => WebhookError::BadRequest(error_text),
            500..=599 => WebhookError::ServiceError(error_text),
            _ => WebhookError::Other(anyhow::anyhow!("HTTP {}: {}", status, error_text)),
        }
    }

    /// Convert network/connection errors into a typed error
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WebhookError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            WebhookError::Network(format!("Connection failed: {}", e))
        } else if let Some(status) = e.status() {
            Self::from_http_status(status, e.to_string())
        } else {
            WebhookError::Other(e.into())
        }
    }
}
