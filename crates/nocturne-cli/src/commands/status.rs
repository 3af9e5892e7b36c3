use anyhow::Result;
use nocturne_fetch::{load_catalog, Config, JsonFileFetcher};

use super::open_ledger;

pub async fn show_status(config: &Config) -> Result<()> {
    println!("\n📊 Nocturne Status\n");
    println!("  Catalog: {}", config.catalog_path.display());

    if config.catalog_path.exists() {
        let fetcher = JsonFileFetcher::new(&config.catalog_path);
        let (catalog, rejected) = load_catalog(&fetcher).await?;
        println!("  Compositions: {}", catalog.len());
        println!("  With recordings: {}", catalog.playable_count());
        println!("  Rejected records: {}", rejected.len());
        for error in &rejected {
            println!("    {error}");
        }
    } else {
        println!("  No catalog yet. Run `nocturne fetch` to create it.");
    }

    let ledger = open_ledger(config)?;
    let downloads = ledger.list_downloads()?;
    println!("\n  Ledger: {}", config.database_path.display());
    println!("  Downloads: {}", downloads.len());
    for entry in &downloads {
        let state = if entry.path.exists() { "" } else { " (missing)" };
        println!(
            "    {}  {}{}",
            entry.remote_id,
            entry.path.display(),
            state
        );
    }

    Ok(())
}
