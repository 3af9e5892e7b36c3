use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("integrity check failed for \"{title}\": expected hash {expected}, found {found}")]
    Integrity {
        title: String,
        expected: String,
        found: String,
    },

    #[error("composition \"{title}\" has no contents")]
    EmptyContent { title: String },

    #[error("no composition in the catalog has any content")]
    EmptyCatalog,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Returns `true` for a title/hash mismatch.
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
