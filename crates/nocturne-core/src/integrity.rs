//! Title integrity hashing.
//!
//! Every persisted record carries the hash of its title. A record whose
//! stored hash disagrees with the recomputed one was corrupted or had its
//! fields attached to the wrong work, and is refused at construction.

use crate::error::{Error, Result};

/// Canonical hash of a composition title: lowercase hex MD5 of its UTF-8 bytes.
#[must_use]
pub fn title_hash(title: &str) -> String {
    format!("{:x}", md5::compute(title.as_bytes()))
}

/// Check `hash` against the canonical hash of `title`.
///
/// # Errors
///
/// Returns [`Error::Integrity`] when the hashes differ.
pub fn verify(title: &str, hash: &str) -> Result<()> {
    let expected = title_hash(title);
    if expected == hash {
        Ok(())
    } else {
        Err(Error::Integrity {
            title: title.to_string(),
            expected,
            found: hash.to_string(),
        })
    }
}
