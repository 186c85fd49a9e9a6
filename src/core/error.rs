//! # Error Handling Module
//!
//! This module defines all error types the gateway can surface to clients,
//! built on the `thiserror` crate. Every error carries enough context to
//! render the uniform gateway error envelope:
//!
//! - `{"error": "..."}` for gateway-local failures
//! - `{"error": "...", "service": "...", "details": "..."}` for failures
//!   attributable to a specific backend service
//!
//! No internal error ever leaks a stack trace or raw transport exception to
//! the client; the `details` string is the only backend-facing diagnostic
//! that crosses the boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main result type used throughout the gateway
///
/// Type alias so call sites can write `GatewayResult<T>` instead of
/// `Result<T, GatewayError>` everywhere.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error types for the gateway request path
///
/// Each variant maps to exactly one client-visible status code via
/// [`GatewayError::status_code`]. The `#[error("...")]` attribute from
/// `thiserror` implements `Display` with the given message.
#[derive(Debug, Error, Clone)]
pub enum GatewayError {
    /// The requested logical service name is not in the route table.
    /// Client error, never retried.
    #[error("Service not found: {service}")]
    ServiceNotFound { service: String },

    /// The outbound request could not be constructed (malformed URL,
    /// invalid header bytes, etc.). Internal error, logged, not retried.
    #[error("Failed to create request: {message}")]
    RequestConstruction { message: String },

    /// The backend could not be reached or the call failed in transport.
    /// Counted as a circuit breaker failure.
    #[error("Service unavailable: {service} - {details}")]
    ServiceUnavailable { service: String, details: String },

    /// The circuit breaker for this service is open; no network call was
    /// attempted. Identical client-visible shape to `ServiceUnavailable`.
    #[error("Circuit breaker open for service: {service}")]
    CircuitOpen { service: String },

    /// Bearer token missing, malformed, or failed validation.
    #[error("Authentication failed: {reason}")]
    Authentication { reason: String },

    /// Fixed-window rate limit exceeded for this client.
    #[error("Rate limit exceeded: {limit} requests per {window_secs}s")]
    RateLimitExceeded { limit: u32, window_secs: u64 },

    /// Configuration-related errors (invalid URLs, bad route patterns).
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal failures.
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl GatewayError {
    /// Create a service-not-found error
    pub fn service_not_found<S: Into<String>>(service: S) -> Self {
        Self::ServiceNotFound {
            service: service.into(),
        }
    }

    /// Create a service-unavailable error with backend detail
    pub fn service_unavailable<S: Into<String>, D: Into<String>>(service: S, details: D) -> Self {
        Self::ServiceUnavailable {
            service: service.into(),
            details: details.into(),
        }
    }

    /// Create a request construction error
    pub fn request_construction<S: Into<String>>(message: S) -> Self {
        Self::RequestConstruction {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth<S: Into<String>>(reason: S) -> Self {
        Self::Authentication {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Map this error to the HTTP status code returned to the client
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::RequestConstruction { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::CircuitOpen { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Authentication { .. } => StatusCode::UNAUTHORIZED,
            Self::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the gateway error envelope for this error
    ///
    /// Backend-attributable errors carry `service` (and `details` where a
    /// transport diagnostic exists); everything else is a bare `{"error"}`.
    pub fn envelope(&self) -> serde_json::Value {
        match self {
            Self::ServiceNotFound { service } => json!({
                "error": "Service not found",
                "service": service,
            }),
            Self::RequestConstruction { .. } => json!({
                "error": "Failed to create request",
            }),
            Self::ServiceUnavailable { service, details } => json!({
                "error": "Service unavailable",
                "service": service,
                "details": details,
            }),
            Self::CircuitOpen { service } => json!({
                "error": "Service unavailable",
                "service": service,
                "details": "circuit breaker is open",
            }),
            Self::Authentication { reason } => json!({
                "error": reason,
            }),
            Self::RateLimitExceeded { .. } => json!({
                "error": "Rate limit exceeded",
            }),
            Self::Configuration { .. } | Self::Internal { .. } => json!({
                "error": "Internal server error",
            }),
        }
    }
}

/// Convert gateway errors into HTTP responses
///
/// This lets handlers return `GatewayResult<Response>` and have axum render
/// the envelope automatically with the right status code.
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.envelope())).into_response()
    }
}

impl From<url::ParseError> for GatewayError {
    fn from(err: url::ParseError) -> Self {
        Self::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
