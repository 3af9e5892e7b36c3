//! Interchange payload for catalogs.
//!
//! A catalog is persisted and exchanged as a JSON array of [`RawRecord`]s:
//!
//! ```json
//! [
//!   {
//!     "title": "Nocturne in E-flat",
//!     "opus": 9,
//!     "subOpus": null,
//!     "number": 2,
//!     "titleHash": "…",
//!     "contents": [{ "remoteId": "9E6b3swbnWg", "artists": "Arthur Rubinstein" }]
//!   }
//! ]
//! ```
//!
//! Older payloads using `sub_opus`, `no`, `md5`, `youtube_dls` and `id` are
//! accepted on read. Artists may be a comma-joined string or a list; they
//! are always written as a list.
//!
//! Records are decoded one array element at a time. An element that does
//! not decode still yields a [`RawRecord`] carrying the decode error, so
//! catalog construction rejects that record alone.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::integrity::title_hash;
use crate::model::Opus;

/// One unvalidated composition record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub title: String,
    pub opus: Opus,
    #[serde(default, alias = "sub_opus")]
    pub sub_opus: Option<u32>,
    #[serde(default, alias = "no")]
    pub number: Option<u32>,
    #[serde(default, alias = "md5")]
    pub title_hash: String,
    #[serde(default, alias = "youtube_dls")]
    pub contents: Vec<RawContent>,
    /// Set when the payload element could not be decoded.
    #[serde(skip)]
    pub decode_error: Option<String>,
}

impl RawRecord {
    /// Start a record whose hash is computed from `title`.
    #[must_use]
    pub fn new(title: impl Into<String>, opus: impl Into<Opus>) -> Self {
        let title = title.into();
        Self {
            title_hash: title_hash(&title),
            title,
            opus: opus.into(),
            sub_opus: None,
            number: None,
            contents: Vec::new(),
            decode_error: None,
        }
    }

    /// Decode one payload element. Decoding failures are kept on the
    /// returned record rather than raised.
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Self {
        let title = value
            .get("title")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        serde_json::from_value(value).unwrap_or_else(|e| Self {
            title,
            opus: Opus::Token(String::new()),
            sub_opus: None,
            number: None,
            title_hash: String::new(),
            contents: Vec::new(),
            decode_error: Some(e.to_string()),
        })
    }

    #[must_use]
    pub fn with_sub_opus(mut self, sub_opus: u32) -> Self {
        self.sub_opus = Some(sub_opus);
        self
    }

    #[must_use]
    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    #[must_use]
    pub fn with_content(mut self, remote_id: impl Into<String>, artists: &[&str]) -> Self {
        self.contents.push(RawContent {
            remote_id: remote_id.into(),
            artists: artists.iter().map(|a| (*a).to_string()).collect(),
        });
        self
    }

    /// Override the stored hash (for replaying persisted or foreign data).
    #[must_use]
    pub fn with_title_hash(mut self, hash: impl Into<String>) -> Self {
        self.title_hash = hash.into();
        self
    }
}

/// One unvalidated content entry of a [`RawRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    #[serde(alias = "id")]
    pub remote_id: String,
    #[serde(default)]
    pub artists: Artists,
}

/// Artist list that deserializes from either `"A, B"` or `["A", "B"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ArtistsRepr", into = "Vec<String>")]
pub struct Artists(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum ArtistsRepr {
    Joined(String),
    List(Vec<String>),
}

impl Artists {
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    /// Split a comma-joined artist string, dropping empty pieces.
    #[must_use]
    pub fn from_joined(joined: &str) -> Self {
        Self(
            joined
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl From<ArtistsRepr> for Artists {
    fn from(repr: ArtistsRepr) -> Self {
        match repr {
            ArtistsRepr::Joined(joined) => Self::from_joined(&joined),
            ArtistsRepr::List(list) => Self(list),
        }
    }
}

impl From<Vec<String>> for Artists {
    fn from(list: Vec<String>) -> Self {
        Self(list)
    }
}

impl From<Artists> for Vec<String> {
    fn from(artists: Artists) -> Self {
        artists.0
    }
}

impl FromIterator<String> for Artists {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse a JSON payload into records.
///
/// # Errors
///
/// Returns [`crate::Error::Serialization`] if the payload is not a JSON
/// array. Malformed elements are returned as records with
/// [`RawRecord::decode_error`] set.
pub fn parse_records(json: &str) -> Result<Vec<RawRecord>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(values.into_iter().map(RawRecord::from_value).collect())
}

/// Render records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`crate::Error::Serialization`] if serialization fails.
pub fn to_json(records: &[RawRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
