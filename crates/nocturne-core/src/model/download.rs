use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A ledger entry recording where a content was downloaded to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadEntry {
    pub remote_id: String,
    pub path: PathBuf,
    pub downloaded_at: DateTime<Utc>,
}

impl DownloadEntry {
    #[must_use]
    pub fn new(remote_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            remote_id: remote_id.into(),
            path: path.into(),
            downloaded_at: Utc::now(),
        }
    }
}
