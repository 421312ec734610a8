//! Error types for encoding and rendering operations

use thiserror::Error;

/// Errors that can occur while encoding or rendering a diagram
#[derive(Error, Debug)]
pub enum RenderError {
    /// HTTP request failed before a response was received (DNS, connect, read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Compressing the diagram source failed
    #[error("Failed to encode diagram source: {0}")]
    Encoding(#[from] std::io::Error),

    /// A token could not be decoded
    #[error("Invalid encoded diagram: {0}")]
    InvalidToken(String),

    /// Server returned a final status other than 200
    #[error("Error rendering SVG: server returned status {status}: {message}")]
    ServerError {
        status: u16,
        message: String,
    },
}

impl RenderError {
    /// HTTP status reported by the server, if this is a server error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;
