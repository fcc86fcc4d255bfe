//! Error handling for csrf-cookie

use thiserror::Error;

/// Main error type for csrf-cookie operations
#[derive(Error, Debug)]
pub enum CsrfError {
    #[error("Browser cookie error: {0}")]
    BrowserCookie(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Cookie '{0}' not found")]
    TokenNotFound(String),
}

/// Result type alias for csrf-cookie operations
pub type Result<T> = std::result::Result<T, CsrfError>;
