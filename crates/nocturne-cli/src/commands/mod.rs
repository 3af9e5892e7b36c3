pub mod config;
pub mod download;
pub mod fetch;
pub mod list;
pub mod pick;
pub mod status;

pub use download::{run_download, run_remove};
pub use fetch::run_fetch;
pub use list::{run_list, show_genres};
pub use pick::{run_pick, run_url};
pub use status::show_status;

use anyhow::{Context, Result};
use nocturne_core::schema::Database;
use nocturne_core::{Catalog, Genre};
use nocturne_fetch::{load_catalog, Config, JsonFileFetcher};

/// Load the cached catalog, warning about records that failed validation.
pub async fn open_catalog(config: &Config) -> Result<Catalog> {
    if !config.catalog_path.exists() {
        anyhow::bail!(
            "No catalog at {}\n\nRun `nocturne fetch` to create it.",
            config.catalog_path.display()
        );
    }

    let fetcher = JsonFileFetcher::new(&config.catalog_path);
    let (catalog, rejected) = load_catalog(&fetcher)
        .await
        .with_context(|| format!("Failed to load {}", config.catalog_path.display()))?;

    for error in &rejected {
        log::warn!("Skipping {}", error);
    }
    Ok(catalog)
}

/// The catalog narrowed to `genres`, or the whole catalog when none given.
pub fn select(catalog: Catalog, genres: &[String]) -> Catalog {
    if genres.is_empty() {
        catalog
    } else {
        catalog.restrict_to(&parse_genres(genres))
    }
}

pub fn parse_genres(tokens: &[String]) -> Vec<Genre> {
    tokens.iter().map(|t| Genre::parse(t)).collect()
}

/// Open the download ledger, creating its directory.
pub fn open_ledger(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    Database::open(&config.database_path).context("Failed to open download ledger")
}
