//! Fetchers backed by local JSON files.

use std::path::{Path, PathBuf};

use nocturne_core::record::parse_records;
use nocturne_core::{Artists, RawContent, RawRecord};
use serde::Deserialize;

use crate::error::{FetchError, FetchResult};
use crate::fetch::Fetcher;
use crate::normalize::normalize_records;

/// Reads a single JSON array of records, such as the catalog cache.
#[derive(Debug, Clone)]
pub struct JsonFileFetcher {
    path: PathBuf,
    name: String,
}

impl JsonFileFetcher {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Fetcher for JsonFileFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_all(&self) -> FetchResult<Vec<RawRecord>> {
        let mut records = read_json(&self.path, &self.name, parse_records).await?;
        normalize_records(&mut records);
        Ok(records)
    }
}

/// A content entry in the two-file layout, tied to its work by title.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedContent {
    title: String,
    #[serde(alias = "id")]
    remote_id: String,
    #[serde(default)]
    artists: Artists,
}

/// Reads a compositions file and a separate contents file, attaching each
/// content to every composition with an equal title.
///
/// Contents keep their file order within each composition. Contents whose
/// title matches no composition are dropped with a warning.
#[derive(Debug, Clone)]
pub struct SplitJsonFetcher {
    compositions_path: PathBuf,
    contents_path: PathBuf,
    name: String,
}

impl SplitJsonFetcher {
    #[must_use]
    pub fn new(compositions_path: impl Into<PathBuf>, contents_path: impl Into<PathBuf>) -> Self {
        let compositions_path = compositions_path.into();
        let contents_path = contents_path.into();
        Self {
            name: format!(
                "{} + {}",
                compositions_path.display(),
                contents_path.display()
            ),
            compositions_path,
            contents_path,
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for SplitJsonFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_all(&self) -> FetchResult<Vec<RawRecord>> {
        let compositions_name = self.compositions_path.display().to_string();
        let contents_name = self.contents_path.display().to_string();

        let mut records =
            read_json(&self.compositions_path, &compositions_name, parse_records).await?;
        let contents: Vec<ListedContent> =
            read_json(&self.contents_path, &contents_name, |json| {
                serde_json::from_str(json)
            })
            .await?;

        for content in contents {
            let mut attached = false;
            for record in records.iter_mut().filter(|r| r.title == content.title) {
                record.contents.push(RawContent {
                    remote_id: content.remote_id.clone(),
                    artists: content.artists.clone(),
                });
                attached = true;
            }
            if !attached {
                log::warn!(
                    "Content {} has no composition titled \"{}\"",
                    content.remote_id,
                    content.title
                );
            }
        }

        normalize_records(&mut records);
        Ok(records)
    }
}

async fn read_json<T, E, F>(path: &Path, name: &str, parse: F) -> FetchResult<T>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: std::fmt::Display,
{
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FetchError::io(path, e))?;
    parse(&content).map_err(|e| FetchError::Parse {
        source_name: name.to_string(),
        message: e.to_string(),
    })
}
