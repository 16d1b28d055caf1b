//! Application-level errors.

use thiserror::Error;

use crate::auth::AuthError;

/// Errors that stop the server from starting or running.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Auth backend settings are unusable.
    #[error("Auth backend error: {0}")]
    Auth(#[from] AuthError),

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Socket or filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
