use anyhow::Result;
use nocturne_fetch::Config;

use super::{open_catalog, select};

pub async fn run_pick(config: &Config, genres: &[String], all: bool) -> Result<()> {
    let catalog = select(open_catalog(config).await?, genres);

    let picked = if all {
        catalog.pick_one_with_all_contents()?
    } else {
        catalog.pick_one()?
    };

    println!("{}", picked.display_name());
    for content in picked.contents() {
        let artists = if content.artists().is_empty() {
            String::from("unknown")
        } else {
            content.artists().join(", ")
        };
        println!("  {}  ({})", content.url(), artists);
    }

    Ok(())
}

pub async fn run_url(config: &Config, genres: &[String]) -> Result<()> {
    let catalog = select(open_catalog(config).await?, genres);
    println!("{}", catalog.random_url()?);
    Ok(())
}
