use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use nocturne_core::ContentRef;
use tokio::process::Command;

use crate::error::{DownloadError, DownloadResult};

/// Turns a content reference into an audio file at a given path.
#[async_trait::async_trait]
pub trait AudioExtractor: Send + Sync + fmt::Debug {
    /// Extract `content` as `audio_format` into `destination`.
    async fn extract(
        &self,
        content: &ContentRef,
        destination: &Path,
        audio_format: &str,
    ) -> DownloadResult<()>;
}

/// Extractor that shells out to `yt-dlp`.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    program: PathBuf,
}

impl YtDlpExtractor {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments for one extraction.
    ///
    /// yt-dlp picks the intermediate extension itself, so the output
    /// template replaces the destination's extension with `%(ext)s`.
    #[must_use]
    pub fn args(content: &ContentRef, destination: &Path, audio_format: &str) -> Vec<OsString> {
        let template = destination.with_extension("%(ext)s");
        vec![
            "--no-playlist".into(),
            "-f".into(),
            "bestaudio/best".into(),
            "-x".into(),
            "--audio-format".into(),
            audio_format.into(),
            "--audio-quality".into(),
            "192K".into(),
            "-o".into(),
            template.into_os_string(),
            content.url().into(),
        ]
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait::async_trait]
impl AudioExtractor for YtDlpExtractor {
    async fn extract(
        &self,
        content: &ContentRef,
        destination: &Path,
        audio_format: &str,
    ) -> DownloadResult<()> {
        log::debug!(
            "Running {} for {} -> {}",
            self.program.display(),
            content.url(),
            destination.display()
        );

        let output = Command::new(&self.program)
            .args(Self::args(content, destination, audio_format))
            .output()
            .await
            .map_err(|e| DownloadError::Failed {
                remote_id: content.remote_id().to_string(),
                message: format!("failed to run {}: {e}", self.program.display()),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(DownloadError::Failed {
                remote_id: content.remote_id().to_string(),
                message: format!("{} ({})", stderr.trim(), output.status),
            })
        }
    }
}
