//! Error types for disease-map

use std::fmt;
use std::io;

/// Result type for disease-map operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while talking to the marker store or loading settings
#[derive(Debug)]
pub enum Error {
    /// Transport-level HTTP failure
    Http(reqwest::Error),

    /// The store answered with a non-success status
    Status { status: u16, url: String },

    /// Malformed JSON payload
    Json(serde_json::Error),

    /// I/O error
    Io(io::Error),

    /// Invalid or unreadable configuration
    Config(String),

    /// CSV writer error
    Csv(csv::Error),

    /// The location source could not produce a fix
    Geolocation(String),

    /// Page template failed to render
    Template(tera::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::Status { status, url } => write!(f, "Unexpected status {} from {}", status, url),
            Error::Json(e) => write!(f, "Malformed JSON: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Csv(e) => write!(f, "CSV error: {}", e),
            Error::Geolocation(msg) => write!(f, "Geolocation error: {}", msg),
            Error::Template(e) => write!(f, "Template error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Template(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Http(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error)
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Config(error.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::Csv(error)
    }
}

impl From<tera::Error> for Error {
    fn from(error: tera::Error) -> Self {
        Error::Template(error)
    }
}
