//! Sources of raw catalog records.

pub mod file;
pub mod http;

pub use file::{JsonFileFetcher, SplitJsonFetcher};
pub use http::HttpFetcher;

use nocturne_core::{Catalog, RawRecord, RecordError};

use crate::error::FetchResult;

/// Something that can produce a finished batch of raw records.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Short name used in log lines and error messages.
    fn name(&self) -> &str;

    /// Fetch every record this source knows about, in source order.
    async fn fetch_all(&self) -> FetchResult<Vec<RawRecord>>;
}

/// Fetch from `fetcher` and build a catalog, keeping rejected records aside.
pub async fn load_catalog(fetcher: &dyn Fetcher) -> FetchResult<(Catalog, Vec<RecordError>)> {
    let records = fetcher.fetch_all().await?;
    log::debug!("Fetched {} records from {}", records.len(), fetcher.name());

    let (catalog, rejected) = Catalog::build(records);
    log::info!(
        "Loaded {} compositions from {} ({} rejected)",
        catalog.len(),
        fetcher.name(),
        rejected.len()
    );
    Ok((catalog, rejected))
}
