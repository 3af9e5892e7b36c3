//! Remote-id normalization.
//!
//! Sources are not consistent about how they reference a recording: some
//! give a bare id, others a share link or a watch URL. Records are
//! normalized to bare ids before they reach the catalog so that the
//! derived URL and the download ledger key agree.

use std::sync::LazyLock;

use nocturne_core::RawRecord;
use regex::Regex;

static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:(?:www|m|music)\.)?(?:youtu\.be/|youtube\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/))([A-Za-z0-9_-]+)",
    )
    .expect("video URL pattern is valid")
});

/// Extract the bare remote id from a share link, watch URL or bare id.
#[must_use]
pub fn remote_id(raw: &str) -> String {
    let raw = raw.trim();
    VIDEO_URL
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| raw.to_string(), |m| m.as_str().to_string())
}

/// Normalize every content id in `records` in place.
pub fn normalize_records(records: &mut [RawRecord]) {
    for record in records {
        for content in &mut record.contents {
            let normalized = remote_id(&content.remote_id);
            if normalized != content.remote_id {
                log::debug!(
                    "Normalized remote id {} -> {} ({})",
                    content.remote_id,
                    normalized,
                    record.title
                );
                content.remote_id = normalized;
            }
        }
    }
}
