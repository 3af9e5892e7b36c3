//! Collaborators around the nocturne catalog.
//!
//! Fetchers turn a JSON cache file or a set of remote JSON payloads into
//! raw records; the downloader materializes a chosen content as a local
//! audio file through an external extractor and keeps the download ledger
//! current. Configuration loading lives here as well.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod cache;
pub mod config;
pub mod download;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod resilience;

pub use config::Config;
pub use download::{AudioExtractor, Downloader, YtDlpExtractor};
pub use error::{DownloadError, DownloadResult, FetchError, FetchResult};
pub use fetch::{load_catalog, Fetcher, HttpFetcher, JsonFileFetcher, SplitJsonFetcher};
