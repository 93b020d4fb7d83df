//! Error types for E2E testing

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("WebDriver failed to start: {0}")]
    DriverStartup(String),

    #[error("WebDriver health check failed after {0} attempts")]
    DriverHealthCheck(usize),

    #[error("WebDriver session could not be created: {0}")]
    SessionNotCreated(String),

    #[error("WebDriver error ({error}): {message}")]
    WebDriver { error: String, message: String },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timed out after {timeout:?} waiting for: {condition}")]
    Timeout { condition: String, timeout: Duration },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Test panicked: {0}")]
    Panicked(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    /// Whether the error is a bounded wait that expired
    pub fn is_timeout(&self) -> bool {
        matches!(self, E2eError::Timeout { .. })
    }
}

pub type E2eResult<T> = Result<T, E2eError>;

/// Fail with [`E2eError::AssertionFailed`] unless `condition` holds
pub fn ensure(condition: bool, message: impl Into<String>) -> E2eResult<()> {
    if condition {
        Ok(())
    } else {
        Err(E2eError::AssertionFailed(message.into()))
    }
}
