//! Error types for butterfly-viz
//!
//! A single error enum covers configuration, upstream API and rendering failures.

use std::fmt;

/// Main error type for butterfly-viz operations
#[derive(Debug)]
pub enum Error {
    /// Required credential missing from the environment
    MissingCredential(String),

    /// HTTP-specific error (non-success status, undecodable body)
    HttpError(String),

    /// Network connectivity issues
    NetworkError(String),

    /// The directions service answered with a non-OK status
    ApiError {
        status: String,
        message: Option<String>,
    },

    /// Encoded polyline could not be decoded
    InvalidPolyline(String),

    /// Invalid configuration or parameters
    InvalidInput(String),

    /// Map document could not be serialized
    SerializationError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingCredential(var) => {
                write!(f, "Missing credential: environment variable '{}' is not set (check your .env file)", var)
            }
            Error::HttpError(msg) => {
                write!(f, "HTTP error: {}", msg)
            }
            Error::NetworkError(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::ApiError { status, message } => match message {
                Some(message) => write!(f, "Directions API returned {}: {}", status, message),
                None => write!(f, "Directions API returned {}", status),
            },
            Error::InvalidPolyline(msg) => {
                write!(f, "Invalid polyline: {}", msg)
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            Error::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::NetworkError(err.to_string())
        } else {
            Error::HttpError(err.to_string())
        }
    }
}

/// Convenience result type for butterfly-viz operations
pub type Result<T> = std::result::Result<T, Error>;
