//! Error types and handling for the `SolarPal` pipeline

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Message shown to callers whenever an upstream provider fails.
pub const UNAVAILABLE_MESSAGE: &str =
    "Solar data is currently unavailable. Please try again later.";

/// Main error type for the `SolarPal` pipeline
#[derive(Error, Debug)]
pub enum SolarPalError {
    /// Malformed input, e.g. an unparseable coordinate pair
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A point outside the supported region
    #[error("Location out of bounds: {message}")]
    OutOfBounds { message: String },

    /// No resolver strategy matched the query
    #[error("Location not found: {query}")]
    NotFound { query: String },

    /// External provider did not answer in time
    #[error("Upstream timeout from {service}: {message}")]
    UpstreamTimeout { service: String, message: String },

    /// External provider answered without usable samples
    #[error("No data from {service}: {message}")]
    UpstreamEmptyData { service: String, message: String },

    /// External provider failed in any other way (status, decoding, transport)
    #[error("Upstream error from {service}: {message}")]
    Upstream { service: String, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    OutOfBounds,
    NotFound,
    UpstreamTimeout,
    UpstreamEmptyData,
    UpstreamUnavailable,
    Config,
}

impl SolarPalError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new out-of-bounds error
    pub fn out_of_bounds<S: Into<String>>(message: S) -> Self {
        Self::OutOfBounds {
            message: message.into(),
        }
    }

    /// Create a new not-found error for a query
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    pub fn upstream_timeout<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::UpstreamTimeout {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn upstream_empty<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::UpstreamEmptyData {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn upstream<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify a transport error coming out of reqwest
    pub fn from_transport(service: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::upstream_timeout(service, err.to_string())
        } else if err.is_decode() {
            Self::upstream(service, format!("invalid response body: {err}"))
        } else {
            Self::upstream(service, err.to_string())
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::Validation,
            Self::OutOfBounds { .. } => ErrorCode::OutOfBounds,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::UpstreamTimeout { .. } => ErrorCode::UpstreamTimeout,
            Self::UpstreamEmptyData { .. } => ErrorCode::UpstreamEmptyData,
            Self::Upstream { .. } => ErrorCode::UpstreamUnavailable,
            Self::Config { .. } => ErrorCode::Config,
        }
    }

    /// True for failures caused by an external provider
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamTimeout { .. } | Self::UpstreamEmptyData { .. } | Self::Upstream { .. }
        )
    }

    /// Get a user-friendly error message.
    ///
    /// Validation and bounds errors are returned verbatim so the caller can
    /// correct the input; upstream failures never expose transport detail.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SolarPalError::Validation { message } => format!("Invalid input: {message}"),
            SolarPalError::OutOfBounds { message } => message.clone(),
            SolarPalError::NotFound { query } => format!("Location not found: {query}"),
            SolarPalError::UpstreamTimeout { .. }
            | SolarPalError::UpstreamEmptyData { .. }
            | SolarPalError::Upstream { .. } => UNAVAILABLE_MESSAGE.to_string(),
            SolarPalError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::OutOfBounds { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::UpstreamEmptyData { .. } => StatusCode::NOT_FOUND,
            Self::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: ErrorCode,
}

impl IntoResponse for SolarPalError {
    fn into_response(self) -> Response {
        if self.is_upstream() {
            tracing::error!(error = %self, "Upstream failure while serving request");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.user_message(),
            code: self.code(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let validation_err = SolarPalError::validation("bad pair");
        assert!(matches!(validation_err, SolarPalError::Validation { .. }));

        let bounds_err = SolarPalError::out_of_bounds("outside");
        assert!(matches!(bounds_err, SolarPalError::OutOfBounds { .. }));

        let timeout_err = SolarPalError::upstream_timeout("NASA POWER", "slow");
        assert!(matches!(timeout_err, SolarPalError::UpstreamTimeout { .. }));
        assert!(timeout_err.is_upstream());
        assert!(!bounds_err.is_upstream());
    }

    #[test]
    fn test_user_messages_hide_upstream_detail() {
        let err = SolarPalError::upstream("NASA POWER", "connection reset by peer 10.0.0.1");
        let message = err.user_message();
        assert_eq!(message, UNAVAILABLE_MESSAGE);
        assert!(!message.contains("10.0.0.1"));

        let err = SolarPalError::upstream_empty("NASA POWER", "all samples were fill values");
        assert_eq!(err.user_message(), UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn test_user_messages_keep_validation_detail() {
        let err = SolarPalError::validation("latitude 'abc' is not a number");
        assert!(err.user_message().contains("latitude 'abc'"));

        let err = SolarPalError::out_of_bounds("Latitude must be within 4.5°-21.5°N");
        assert!(err.user_message().contains("4.5°-21.5°N"));

        let err = SolarPalError::not_found("Atlantis");
        assert!(err.user_message().contains("Atlantis"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SolarPalError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SolarPalError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SolarPalError::upstream_timeout("a", "b").status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            SolarPalError::upstream("a", "b").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            SolarPalError::upstream("a", "b").code(),
            ErrorCode::UpstreamUnavailable
        );
    }
}
