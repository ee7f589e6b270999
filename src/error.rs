//! Error type shared across the crate.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, GlancesError>;

#[derive(Debug, Error)]
pub enum GlancesError {
    /// A required config key was absent at setup time.
    #[error("required config key missing: {0}")]
    MissingConfig(&'static str),

    /// The endpoint URL could not be turned into a request.
    #[error("malformed glances resource '{url}': {source}")]
    InvalidResource { url: String, source: reqwest::Error },

    /// The initial connectivity probe could not reach the endpoint.
    #[error("no route to glances endpoint '{url}': {source}")]
    Unreachable { url: String, source: reqwest::Error },

    /// The initial connectivity probe got a non-2xx answer.
    #[error("glances endpoint '{url}' answered with status {status}")]
    ProbeStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// A transport or decode failure during an update, other than a plain
    /// connection failure (those are absorbed by the fetcher).
    #[error("glances request failed: {0}")]
    Http(#[from] reqwest::Error),
}
