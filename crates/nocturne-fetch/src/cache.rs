//! On-disk catalog cache.
//!
//! The cache is the same JSON record array the fetchers read, so a cached
//! catalog is loaded back with [`JsonFileFetcher`](crate::JsonFileFetcher).

use std::path::Path;

use nocturne_core::record::to_json;
use nocturne_core::RawRecord;

use crate::error::{FetchError, FetchResult};

/// Write `records` to `path`, creating parent directories.
///
/// The payload goes to a sibling temporary file first and is renamed into
/// place, so readers never observe a half-written cache.
pub fn write_cache(path: &Path, records: &[RawRecord]) -> FetchResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| FetchError::io(parent, e))?;
        }
    }

    let json = to_json(records)?;
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    std::fs::write(tmp_path, json).map_err(|e| FetchError::io(tmp_path, e))?;
    std::fs::rename(tmp_path, path).map_err(|e| FetchError::io(path, e))?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
