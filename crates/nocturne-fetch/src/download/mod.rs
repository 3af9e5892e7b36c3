//! Materializing contents as local audio files.
//!
//! [`Downloader`] owns the extractor and the download ledger. It is the
//! only writer of the ledger, so `remove` can trust that every entry was
//! produced by a successful `download`.

pub mod extractor;

pub use extractor::{AudioExtractor, YtDlpExtractor};

use std::path::{Path, PathBuf};

use nocturne_core::schema::Database;
use nocturne_core::{Composition, ContentRef, DownloadEntry};

use crate::error::{DownloadError, DownloadResult};

#[derive(Debug)]
pub struct Downloader<E: AudioExtractor> {
    extractor: E,
    ledger: Database,
    audio_format: String,
}

impl<E: AudioExtractor> Downloader<E> {
    #[must_use]
    pub fn new(extractor: E, ledger: Database, audio_format: impl Into<String>) -> Self {
        Self {
            extractor,
            ledger,
            audio_format: audio_format.into(),
        }
    }

    #[must_use]
    pub const fn ledger(&self) -> &Database {
        &self.ledger
    }

    #[must_use]
    pub fn audio_format(&self) -> &str {
        &self.audio_format
    }

    /// Default destination for the content at `index` of `composition`:
    /// `dir` joined with [`Composition::filename`].
    pub fn destination_for(
        &self,
        composition: &Composition,
        index: i64,
        dir: &Path,
    ) -> DownloadResult<PathBuf> {
        Ok(dir.join(composition.filename(index, &self.audio_format)?))
    }

    /// Download `content` to `destination`.
    ///
    /// The audio extension is appended when `destination` lacks it. Returns
    /// the final path.
    ///
    /// # Errors
    /// - [`DownloadError::AlreadyExists`] if the destination exists and
    ///   `overwrite` is false.
    /// - [`DownloadError::Failed`] if extraction fails.
    pub async fn download(
        &self,
        content: &ContentRef,
        destination: &Path,
        overwrite: bool,
    ) -> DownloadResult<PathBuf> {
        let destination = with_audio_extension(destination, &self.audio_format);
        if !overwrite && destination.exists() {
            return Err(DownloadError::AlreadyExists { path: destination });
        }

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        log::info!("Downloading {} -> {}", content.url(), destination.display());
        self.extractor
            .extract(content, &destination, &self.audio_format)
            .await?;

        if !destination.exists() {
            return Err(DownloadError::Failed {
                remote_id: content.remote_id().to_string(),
                message: format!("extractor produced no file at {}", destination.display()),
            });
        }

        self.ledger
            .record_download(&DownloadEntry::new(content.remote_id(), &destination))?;
        Ok(destination)
    }

    /// Delete the file previously downloaded for `remote_id`.
    ///
    /// # Errors
    /// [`DownloadError::NotFound`] if nothing was downloaded for `remote_id`
    /// or the file is already gone. A stale ledger entry is cleared either
    /// way.
    pub fn remove(&self, remote_id: &str) -> DownloadResult<PathBuf> {
        let Some(entry) = self.ledger.get_download(remote_id)? else {
            return Err(DownloadError::NotFound {
                remote_id: remote_id.to_string(),
                reason: "no download recorded".to_string(),
            });
        };

        if !entry.path.exists() {
            self.ledger.delete_download(remote_id)?;
            return Err(DownloadError::NotFound {
                remote_id: remote_id.to_string(),
                reason: format!("file no longer exists at {}", entry.path.display()),
            });
        }

        std::fs::remove_file(&entry.path)?;
        self.ledger.delete_download(remote_id)?;
        log::info!("Removed {}", entry.path.display());
        Ok(entry.path)
    }

    /// Where `remote_id` was downloaded to, if the ledger knows.
    pub fn local_path(&self, remote_id: &str) -> DownloadResult<Option<PathBuf>> {
        Ok(self.ledger.get_download(remote_id)?.map(|entry| entry.path))
    }
}

/// Append `.{ext}` unless `path` already ends with it.
fn with_audio_extension(path: &Path, ext: &str) -> PathBuf {
    let ext = ext.strip_prefix('.').unwrap_or(ext);
    if path.extension().is_some_and(|current| current == ext) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
