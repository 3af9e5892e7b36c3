use anyhow::Result;
use nocturne_core::Genre;
use nocturne_fetch::Config;

use super::{open_catalog, parse_genres};

pub async fn run_list(config: &Config, genres: &[String]) -> Result<()> {
    let catalog = open_catalog(config).await?;

    let genres = if genres.is_empty() {
        Genre::all().collect()
    } else {
        parse_genres(genres)
    };

    for genre in genres {
        let compositions = catalog.by_genres(&[genre]);
        if compositions.is_empty() {
            continue;
        }
        println!("\n{genre}");
        for composition in compositions {
            println!(
                "  {} ({} recordings)",
                composition.display_name(),
                composition.contents().len()
            );
        }
    }

    Ok(())
}

pub async fn show_genres(config: &Config) -> Result<()> {
    let catalog = open_catalog(config).await?;

    for (genre, count) in catalog.genre_counts() {
        println!("  {:<12} {}", genre.token(), count);
    }

    Ok(())
}
