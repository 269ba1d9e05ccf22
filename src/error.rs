//! Error types for the gumroad-mcp server

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Gumroad operations
#[derive(Error, Debug)]
pub enum GumroadError {
    #[error(
        "Gumroad access token not configured. Set GUMROAD_ACCESS_TOKEN or write {{\"access_token\": \"...\"}} to {}",
        .0.display()
    )]
    MissingToken(PathBuf),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gumroad returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Gumroad API error: {0}")]
    Api(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, GumroadError>;
