use crate::error::{Error, Result};
use crate::record::{Artists, RawContent};

/// URL prefix every remote id is appended to.
pub const URL_PREFIX: &str = "https://youtu.be/";

/// One externally hosted recording of a composition.
///
/// Immutable once built. Whether it has been downloaded is tracked in the
/// download ledger, keyed by [`ContentRef::remote_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentRef {
    remote_id: String,
    artists: Vec<String>,
}

impl ContentRef {
    /// Create a content reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if `remote_id` is empty.
    pub fn new(remote_id: impl Into<String>, artists: Vec<String>) -> Result<Self> {
        let remote_id = remote_id.into();
        if remote_id.trim().is_empty() {
            return Err(Error::InvalidData("content remote id is empty".to_string()));
        }
        Ok(Self { remote_id, artists })
    }

    #[must_use]
    pub fn remote_id(&self) -> &str {
        &self.remote_id
    }

    /// Performers, in display order.
    #[must_use]
    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("{URL_PREFIX}{}", self.remote_id)
    }

    /// Artists as a filename fragment: `A&B&`, with spaces as underscores.
    #[must_use]
    pub fn display_artists(&self) -> String {
        let mut fragment = self.artists.join("&");
        fragment.push('&');
        fragment.replace(' ', "_")
    }

    #[must_use]
    pub fn to_raw(&self) -> RawContent {
        RawContent {
            remote_id: self.remote_id.clone(),
            artists: Artists::from(self.artists.clone()),
        }
    }
}

impl TryFrom<RawContent> for ContentRef {
    type Error = Error;

    fn try_from(raw: RawContent) -> Result<Self> {
        Self::new(raw.remote_id, raw.artists.into_inner())
    }
}
