use anyhow::Result;
use nocturne_fetch::{Config, Downloader, YtDlpExtractor};
use std::path::PathBuf;

use super::{open_catalog, open_ledger, select};

fn downloader(config: &Config) -> Result<Downloader<YtDlpExtractor>> {
    Ok(Downloader::new(
        YtDlpExtractor::new(&config.yt_dlp_path),
        open_ledger(config)?,
        &config.audio_format,
    ))
}

pub async fn run_download(
    config: &Config,
    genres: &[String],
    output: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let catalog = select(open_catalog(config).await?, genres);
    let picked = catalog.pick_one()?;
    let content = picked.content(0)?;

    let downloader = downloader(config)?;
    let destination = match output {
        Some(path) => path,
        None => downloader.destination_for(&picked, 0, &config.download_dir)?,
    };

    println!("{}", picked.display_name());
    println!("  ⏳ {}", content.url());
    let path = downloader.download(content, &destination, force).await?;
    println!("  ✓ Saved to {}", path.display());

    Ok(())
}

pub fn run_remove(config: &Config, remote_id: &str) -> Result<()> {
    let path = downloader(config)?.remove(remote_id)?;
    println!("✓ Removed {}", path.display());
    Ok(())
}
