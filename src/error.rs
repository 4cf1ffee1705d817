//! Failure taxonomy of the scraping pipeline.

use thiserror::Error;

/// Failure of a single HTTP attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection-level failure (DNS, refused/reset, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {0}")]
    Status(u16),
}

/// Pipeline error.
#[derive(Debug, Error)]
pub enum Error {
    /// Every allowed attempt on a URL failed.
    #[error("gave up on {url} after {attempts} attempts")]
    RetriesExhausted {
        /// Requested URL.
        url: String,
        /// Number of attempts performed.
        attempts: u32,
        /// Last failure observed.
        source: FetchError,
    },

    /// A single-attempt page fetch failed.
    #[error("fetch {url}")]
    Fetch {
        /// Requested URL.
        url: String,
        /// The underlying failure.
        source: FetchError,
    },

    /// The markup does not contain an expected element.
    #[error("no element matching `{selector}`")]
    MissingElement {
        /// Selector that matched nothing.
        selector: &'static str,
    },

    /// An attribute value could not be parsed.
    #[error("invalid {what}: `{value}`")]
    Parse {
        /// What was being parsed.
        what: &'static str,
        /// The offending value.
        value: String,
    },
}
