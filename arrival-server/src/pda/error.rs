//! Arrival service error types.

use std::fmt;

/// Which stop document failed to parse.
///
/// The stop page is repaired by the HTML parser and never fails to parse,
/// so only the live feed appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    /// The live arrival feed.
    ArrivalFeed,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::ArrivalFeed => f.write_str("arrival feed"),
        }
    }
}

/// Errors from fetching or parsing stop documents.
#[derive(Debug, thiserror::Error)]
pub enum PdaError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body does not have the expected top-level shape
    #[error("{document} parse error: {message}")]
    Parse {
        document: Document,
        message: String,
        /// Start of the offending body, for diagnostics.
        body: Option<String>,
    },
}

impl PdaError {
    /// Transport or HTTP status failure. Callers decide whether to retry.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, PdaError::Http(_) | PdaError::Api { .. })
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, PdaError::Parse { .. })
    }
}
