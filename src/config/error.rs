//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error(
        "Request timeout ({request_secs}s) must exceed the longest provider call ({provider_secs}s)"
    )]
    RequestTimeoutTooShort { request_secs: u64, provider_secs: u64 },

    #[error("Session idle TTL must be greater than zero")]
    InvalidSessionTtl,

    #[error("Invalid AI provider timeout")]
    InvalidAiTimeout,

    #[error("Model name for {0} cannot be empty")]
    EmptyModel(&'static str),

    #[error("Invalid provider base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("max_output_tokens must be greater than thinking_budget")]
    InvalidTokenBudget,
}
