//! Error types for fetching and downloading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching raw records.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A source answered with a non-success HTTP status.
    #[error("HTTP {status} from {source_name}")]
    Http { source_name: String, status: u16 },

    /// The source returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// A payload could not be parsed as a record array.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fetch task ended without producing a result.
    #[error("fetch of {source_name} was aborted")]
    Aborted { source_name: String },

    #[error("catalog error: {0}")]
    Core(#[from] nocturne_core::Error),
}

impl FetchError {
    /// Returns `true` when the error is transient and the request may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors at the download boundary.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The extractor failed to produce the file.
    #[error("download of {remote_id} failed: {message}")]
    Failed { remote_id: String, message: String },

    #[error("destination already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// Nothing to remove for this content.
    #[error("nothing to remove for {remote_id}: {reason}")]
    NotFound { remote_id: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog or ledger failure.
    #[error(transparent)]
    Core(#[from] nocturne_core::Error),
}

impl DownloadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

pub type DownloadResult<T> = std::result::Result<T, DownloadError>;
