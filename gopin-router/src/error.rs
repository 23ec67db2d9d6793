//! Error types for request dispatch

use axum::http::StatusCode;

use crate::grammar::GrammarKind;

/// Result type alias for dispatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why one URL grammar did not accept a request path
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// The path does not have the grammar's shape
    #[error("Not a {grammar} package request")]
    NoMatch { grammar: GrammarKind },

    /// The path has the shape of a semver-pinned request, but the selector is invalid
    #[error("Invalid version selector: {0}")]
    Selector(#[from] gopin_semver::selector::Error),
}

/// Comprehensive error type for dispatch operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No URL grammar accepts the request path
    #[error("Invalid package request {path:?}: {}", describe(.attempts))]
    InvalidPackageRequest { path: String, attempts: Vec<GrammarError> },

    /// The selector is valid, but no version of the package satisfies it
    #[error("No version of {author}/{repo} satisfies \"{selector}\"")]
    NoSuchPackageVersion {
        author: String,
        repo: String,
        selector: String,
    },

    /// The upstream ref fetch failed in transport
    #[error("Upstream error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream answered the ref fetch with a non-success status
    #[error("Upstream responded with {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// The upstream ref advertisement could not be parsed or rewritten
    #[error("Advertisement error: {0}")]
    Advertisement(#[from] gopin_refs::Error),

    /// A URL grammar failed to compile
    #[error("Grammar error: {0}")]
    Grammar(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe(attempts: &[GrammarError]) -> String {
    attempts.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl Error {
    /// Create a configuration error with a message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The HTTP status this error is answered with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPackageRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NoSuchPackageVersion { .. } => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::UpstreamStatus { .. } | Self::Advertisement(_) => StatusCode::BAD_GATEWAY,
            Self::Grammar(_) | Self::Config { .. } | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error is caused by the request rather than by the proxy or upstream
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidPackageRequest { .. } | Self::NoSuchPackageVersion { .. })
    }
}
