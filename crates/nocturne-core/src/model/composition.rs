use std::fmt;

use crate::error::{Error, Result};
use crate::integrity;
use crate::model::content::ContentRef;
use crate::model::opus::Opus;
use crate::record::RawRecord;
use crate::taxonomy::Genre;

/// One cataloged musical work and its recordings.
///
/// The title hash is checked on construction, so a `Composition` value
/// always carries a title that agrees with its stored hash. All fields are
/// read-only; query results are independent clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    title: String,
    opus: Opus,
    sub_opus: Option<u32>,
    number: Option<u32>,
    contents: Vec<ContentRef>,
    title_hash: String,
}

impl Composition {
    /// Build a composition, verifying `title_hash` against `title`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Integrity`] when the hash does not match.
    pub fn new(
        title: impl Into<String>,
        opus: impl Into<Opus>,
        sub_opus: Option<u32>,
        number: Option<u32>,
        contents: Vec<ContentRef>,
        title_hash: impl Into<String>,
    ) -> Result<Self> {
        let title = title.into();
        let title_hash = title_hash.into();
        integrity::verify(&title, &title_hash)?;

        Ok(Self {
            title,
            opus: opus.into(),
            sub_opus,
            number,
            contents,
            title_hash,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn opus(&self) -> &Opus {
        &self.opus
    }

    #[must_use]
    pub const fn sub_opus(&self) -> Option<u32> {
        self.sub_opus
    }

    /// The "No." within the opus, if any.
    #[must_use]
    pub const fn number(&self) -> Option<u32> {
        self.number
    }

    #[must_use]
    pub fn contents(&self) -> &[ContentRef] {
        &self.contents
    }

    #[must_use]
    pub fn title_hash(&self) -> &str {
        &self.title_hash
    }

    #[must_use]
    pub fn has_contents(&self) -> bool {
        !self.contents.is_empty()
    }

    /// `"{title} Op.{opus}[-{sub_opus}][ No.{number}]"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut name = format!("{} Op.{}", self.title, self.opus);
        if let Some(sub) = self.sub_opus {
            name.push('-');
            name.push_str(&sub.to_string());
        }
        if let Some(number) = self.number {
            name.push_str(" No.");
            name.push_str(&number.to_string());
        }
        name
    }

    /// Content at `index`, wrapping around the list in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContent`] when the composition has no contents.
    pub fn content(&self, index: i64) -> Result<&ContentRef> {
        if self.contents.is_empty() {
            return Err(Error::EmptyContent {
                title: self.title.clone(),
            });
        }
        let len = self.contents.len() as i64;
        // rem_euclid keeps the result in 0..len
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let wrapped = index.rem_euclid(len) as usize;
        Ok(&self.contents[wrapped])
    }

    /// Filename for the content at `index` (wrapping), e.g.
    /// `Nocturne_in_E-flat_9_2_Arthur_Rubinstein&.mp3`.
    ///
    /// `ext` may be given with or without its leading dot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContent`] when the composition has no contents.
    pub fn filename(&self, index: i64, ext: &str) -> Result<String> {
        let content = self.content(index)?;
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        let name = format!(
            "{} {}.{}",
            self.display_name(),
            content.display_artists(),
            ext
        );
        Ok(name
            .replace("Op.", "")
            .replace("No.", "")
            .replace(' ', "_"))
    }

    /// Every genre this composition belongs to; `[Others]` if none.
    #[must_use]
    pub fn genres(&self) -> Vec<Genre> {
        Genre::classify(&self.title)
    }

    #[must_use]
    pub fn is_genre(&self, genre: Genre) -> bool {
        genre.matches(&self.title)
    }

    /// Copy of this composition holding only the content at `index`.
    pub(crate) fn narrowed_to(&self, index: usize) -> Self {
        Self {
            contents: self.contents.get(index).cloned().into_iter().collect(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn to_record(&self) -> RawRecord {
        RawRecord {
            title: self.title.clone(),
            opus: self.opus.clone(),
            sub_opus: self.sub_opus,
            number: self.number,
            title_hash: self.title_hash.clone(),
            contents: self.contents.iter().map(ContentRef::to_raw).collect(),
            decode_error: None,
        }
    }
}

impl TryFrom<RawRecord> for Composition {
    type Error = Error;

    fn try_from(record: RawRecord) -> Result<Self> {
        if let Some(message) = record.decode_error {
            return Err(Error::Malformed(message));
        }

        let contents = record
            .contents
            .into_iter()
            .map(ContentRef::try_from)
            .collect::<Result<Vec<_>>>()?;

        Self::new(
            record.title,
            record.opus,
            record.sub_opus,
            record.number,
            contents,
            record.title_hash,
        )
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::title_hash;

    fn content(id: &str, artists: &[&str]) -> ContentRef {
        ContentRef::new(id, artists.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn nocturne(contents: Vec<ContentRef>) -> Composition {
        let title = "Nocturne in E-flat";
        Composition::new(title, 9_u32, None, Some(2), contents, title_hash(title)).unwrap()
    }

    #[test]
    fn test_composition_new_verifies_hash() {
        let composition = nocturne(vec![]);
        assert_eq!(composition.title_hash(), title_hash(composition.title()));
    }

    #[test]
    fn test_composition_wrong_hash_fails() {
        let result = Composition::new(
            "Nocturne in E-flat",
            9_u32,
            None,
            Some(2),
            vec![content("a", &[])],
            title_hash("Grande Valse"),
        );
        assert!(matches!(result, Err(Error::Integrity { .. })));
    }

    #[test]
    fn test_display_name_variants() {
        assert_eq!(nocturne(vec![]).display_name(), "Nocturne in E-flat Op.9 No.2");

        let title = "Mazurka";
        let mazurka =
            Composition::new(title, 7_u32, Some(1), Some(3), vec![], title_hash(title)).unwrap();
        assert_eq!(mazurka.display_name(), "Mazurka Op.7-1 No.3");

        let title = "Grande Valse";
        let valse = Composition::new(title, 18_u32, None, None, vec![], title_hash(title)).unwrap();
        assert_eq!(valse.display_name(), "Grande Valse Op.18");
        assert_eq!(valse.to_string(), "Grande Valse Op.18");

        let title = "Waltz in A minor";
        let posth =
            Composition::new(title, "posth.", None, None, vec![], title_hash(title)).unwrap();
        assert_eq!(posth.display_name(), "Waltz in A minor Op.posth.");
    }

    #[test]
    fn test_filename() {
        let composition = nocturne(vec![content("a", &["Arthur Rubinstein"])]);
        assert_eq!(
            composition.filename(0, "mp3").unwrap(),
            "Nocturne_in_E-flat_9_2_Arthur_Rubinstein&.mp3"
        );
        assert_eq!(
            composition.filename(0, ".mp3").unwrap(),
            composition.filename(0, "mp3").unwrap()
        );
    }

    #[test]
    fn test_filename_wraps_any_index() {
        let composition = nocturne(vec![
            content("a", &["Arthur Rubinstein"]),
            content("b", &["Maurizio Pollini"]),
            content("c", &["Martha Argerich"]),
        ]);
        let n = composition.contents().len() as i64;

        for index in [-7_i64, -3, -1, 0, 1, 2, 3, 4, 100, i64::MAX, i64::MIN] {
            assert_eq!(
                composition.filename(index, "mp3").unwrap(),
                composition.filename(index.rem_euclid(n), "mp3").unwrap(),
                "index {index}"
            );
        }
        assert!(composition
            .filename(-1, "mp3")
            .unwrap()
            .contains("Martha_Argerich"));
    }

    #[test]
    fn test_filename_empty_contents_fails() {
        let composition = nocturne(vec![]);
        assert!(matches!(
            composition.filename(0, "mp3"),
            Err(Error::EmptyContent { .. })
        ));
    }

    #[test]
    fn test_narrowed_to_keeps_one_content() {
        let composition = nocturne(vec![content("a", &[]), content("b", &[])]);
        let narrowed = composition.narrowed_to(1);
        assert_eq!(narrowed.contents().len(), 1);
        assert_eq!(narrowed.contents()[0].remote_id(), "b");
        assert_eq!(narrowed.display_name(), composition.display_name());
    }

    #[test]
    fn test_record_round_trip() {
        let composition = nocturne(vec![content("a", &["Arthur Rubinstein", "Adam Harasiewicz"])]);
        let rebuilt = Composition::try_from(composition.to_record()).unwrap();
        assert_eq!(rebuilt, composition);
    }

    #[test]
    fn test_genres() {
        let composition = nocturne(vec![]);
        assert_eq!(composition.genres(), vec![Genre::Nocturne]);
        assert!(composition.is_genre(Genre::Nocturne));
        assert!(!composition.is_genre(Genre::Others));
    }
}
