//! Centralized error types for Nimbus.
//!
//! This module provides a typed error hierarchy that:
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for debugging/logging
//!
//! The background resolver itself never surfaces errors to its callers; these
//! types describe failures around it (configuration, presenter, media loading).
//! `NetworkError` only classifies search failures for the resolver's logs.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Background error: {0}")]
    Backdrop(#[from] BackdropError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Backdrop(e) => e.user_message(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }

    /// Recover the typed error from an `anyhow` chain, if it carries one.
    pub fn from_anyhow(error: anyhow::Error) -> Self {
        match error.downcast::<ConfigError>() {
            Ok(e) => AppError::Config(e),
            Err(error) => AppError::Other(error),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Weather background errors observable by the UI layer.
///
/// Missing credentials and remote search failures never reach this type;
/// they degrade to fallback images inside the resolver.
#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("Background media failed to load: {url} ({reason})")]
    MediaLoadFailed { url: String, reason: String },

    #[error("Background resolution failed: {0}")]
    ResolveFailed(String),

    #[error("Background service unavailable")]
    ServiceUnavailable,
}

impl BackdropError {
    pub fn user_message(&self) -> &'static str {
        match self {
            BackdropError::MediaLoadFailed { .. } => "Background image could not be displayed.",
            BackdropError::ResolveFailed(_) => "Background could not be loaded.",
            BackdropError::ServiceUnavailable => "Background service is not ready yet.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Config(ConfigError::Invalid("test".into())),
            AppError::Backdrop(BackdropError::ServiceUnavailable),
            AppError::Backdrop(BackdropError::MediaLoadFailed {
                url: "https://example.com/a.gif".into(),
                reason: "404".into(),
            }),
            AppError::Other(anyhow::anyhow!("boom")),
        ];

        for e in errors {
            assert!(!e.user_message().is_empty());
        }
    }

    #[test]
    fn test_from_anyhow_recovers_config_error() {
        let err: anyhow::Error = ConfigError::ParseError("expected `=`".into()).into();
        let app = AppError::from_anyhow(err);
        assert!(matches!(app, AppError::Config(ConfigError::ParseError(_))));
        assert_eq!(
            app.user_message(),
            "Configuration file is malformed. Check your settings."
        );

        let other = AppError::from_anyhow(anyhow::anyhow!("boom"));
        assert!(matches!(other, AppError::Other(_)));
    }

    #[test]
    fn test_server_error_display_includes_status() {
        let e = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(e.to_string(), "Server error: 503 - down");
    }

    #[test]
    fn test_media_load_failed_display_includes_url() {
        let e = BackdropError::MediaLoadFailed {
            url: "https://example.com/bg.mp4".into(),
            reason: "decode error".into(),
        };
        let s = e.to_string();
        assert!(s.contains("https://example.com/bg.mp4"));
        assert!(s.contains("decode error"));
    }

    #[test]
    fn test_backdrop_error_converts_to_app_error() {
        let app: AppError = BackdropError::ResolveFailed("task panicked".into()).into();
        assert!(matches!(app, AppError::Backdrop(_)));
        assert_eq!(app.user_message(), "Background could not be loaded.");
    }
}
