use anyhow::{Context, Result};
use nocturne_core::Catalog;
use nocturne_fetch::cache::write_cache;
use nocturne_fetch::{Config, HttpFetcher};

pub async fn run_fetch(config: &Config, urls: Vec<String>) -> Result<()> {
    let urls = if urls.is_empty() {
        config.sources.clone()
    } else {
        urls
    };
    if urls.is_empty() {
        anyhow::bail!(
            "No sources to fetch from.\n\nPass URLs, or set `sources` with `nocturne config init`."
        );
    }

    log::info!("Fetching {} sources", urls.len());
    let fetcher = HttpFetcher::new(urls, config.max_concurrent_fetches)
        .context("Failed to create HTTP client")?;

    let mut records = Vec::new();
    let mut failures = 0;
    for (url, result) in fetcher.fetch_tagged().await {
        match result {
            Ok(fetched) => {
                println!("  ✓ {url}: {} records", fetched.len());
                records.extend(fetched);
            }
            Err(e) => {
                eprintln!("  ✗ {url}: {e}");
                failures += 1;
            }
        }
    }

    if records.is_empty() && failures > 0 {
        anyhow::bail!("Every source failed; cache left unchanged");
    }

    let (catalog, rejected) = Catalog::build(records);
    for error in &rejected {
        eprintln!("  ✗ {error}");
    }

    write_cache(&config.catalog_path, &catalog.records())?;

    println!(
        "\n✓ Cached {} compositions ({} playable) in {}",
        catalog.len(),
        catalog.playable_count(),
        config.catalog_path.display()
    );
    if failures > 0 || !rejected.is_empty() {
        println!("  {failures} sources failed, {} records rejected", rejected.len());
    }

    Ok(())
}
