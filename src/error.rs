//! Error taxonomy shared across the crate

use thiserror::Error;

/// Errors surfaced by the content client, normalizer and renderer
#[derive(Debug, Error)]
pub enum Error {
    /// The content API endpoint is missing or unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No document matched the requested type/uid pair
    #[error("document not found: {doc_type}/{uid}")]
    NotFound { doc_type: String, uid: String },

    /// A required field was absent from an API response
    #[error("malformed API response: missing field `{0}`")]
    MissingField(&'static str),

    /// The HTTP request itself failed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API request to {url} failed with status {status}")]
    Api {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Template rendering failed
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl Error {
    /// Whether this error means the requested document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
