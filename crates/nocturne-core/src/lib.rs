//! Core catalog model for nocturne.
//!
//! This crate defines the composition registry (ContentRef, Composition,
//! Opus), genre classification, the Catalog query and random-selection
//! engine, the interchange record payload, and the SQLite download ledger.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod integrity;
pub mod model;
pub mod record;
pub mod schema;
pub mod taxonomy;

pub use catalog::{Catalog, RecordError};
pub use error::{Error, Result};
pub use model::{Composition, ContentRef, DownloadEntry, Opus};
pub use record::{Artists, RawContent, RawRecord};
pub use taxonomy::Genre;
