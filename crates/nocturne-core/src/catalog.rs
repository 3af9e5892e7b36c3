//! The composition catalog and its query engine.
//!
//! A [`Catalog`] is built once from raw records and is read-only afterward.
//! Every query hands back owned clones, so callers can never reach into
//! catalog state.
//!
//! Random selection is uniform over compositions that have at least one
//! content, then uniform over that composition's contents. It is not
//! uniform over (composition, content) pairs. The playable index set is
//! computed at build time, so selection never loops.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::model::Composition;
use crate::record::RawRecord;
use crate::taxonomy::Genre;

/// A record that could not become a [`Composition`].
#[derive(Debug, Error)]
#[error("record {index} (\"{title}\"): {source}")]
pub struct RecordError {
    /// Position of the record in the input batch.
    pub index: usize,
    pub title: String,
    #[source]
    pub source: Error,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    compositions: Vec<Composition>,
    /// Indices of compositions with at least one content.
    playable: Vec<usize>,
}

impl Catalog {
    #[must_use]
    pub fn new(compositions: Vec<Composition>) -> Self {
        let playable = compositions
            .iter()
            .enumerate()
            .filter(|(_, composition)| composition.has_contents())
            .map(|(index, _)| index)
            .collect();
        Self {
            compositions,
            playable,
        }
    }

    /// Build a catalog, setting aside records that fail validation.
    ///
    /// Returns the catalog of every valid record, in input order, together
    /// with one [`RecordError`] per rejected record.
    pub fn build(records: impl IntoIterator<Item = RawRecord>) -> (Self, Vec<RecordError>) {
        let mut compositions = Vec::new();
        let mut rejected = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            let title = record.title.clone();
            match Composition::try_from(record) {
                Ok(composition) => compositions.push(composition),
                Err(source) => {
                    log::warn!("Rejected record {} (\"{}\"): {}", index, title, source);
                    rejected.push(RecordError {
                        index,
                        title,
                        source,
                    });
                }
            }
        }

        let catalog = Self::new(compositions);
        log::debug!(
            "Built catalog: {} compositions ({} playable), {} rejected",
            catalog.len(),
            catalog.playable_count(),
            rejected.len()
        );
        (catalog, rejected)
    }

    /// Build a catalog, failing on the first invalid record.
    pub fn build_strict(
        records: impl IntoIterator<Item = RawRecord>,
    ) -> std::result::Result<Self, RecordError> {
        let compositions = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let title = record.title.clone();
                Composition::try_from(record).map_err(|source| RecordError {
                    index,
                    title,
                    source,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(compositions))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.compositions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compositions.is_empty()
    }

    /// Number of compositions with at least one content.
    #[must_use]
    pub fn playable_count(&self) -> usize {
        self.playable.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Composition> {
        self.compositions.iter()
    }

    /// Compositions for each requested genre token, concatenated in request
    /// order. Unknown tokens read as "Others". A composition matching several
    /// requested genres appears once per genre.
    #[must_use]
    pub fn by_genre<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<Composition> {
        let genres: Vec<Genre> = tokens.iter().map(|t| Genre::parse(t.as_ref())).collect();
        self.by_genres(&genres)
    }

    #[must_use]
    pub fn by_genres(&self, genres: &[Genre]) -> Vec<Composition> {
        genres
            .iter()
            .flat_map(|&genre| self.iter().filter(move |c| c.is_genre(genre)))
            .cloned()
            .collect()
    }

    /// A new catalog with each composition matching any of `genres`, once,
    /// in catalog order.
    #[must_use]
    pub fn restrict_to(&self, genres: &[Genre]) -> Self {
        Self::new(
            self.iter()
                .filter(|c| genres.iter().any(|&genre| c.is_genre(genre)))
                .cloned()
                .collect(),
        )
    }

    /// Composition count per genre, known genres first, then Others.
    #[must_use]
    pub fn genre_counts(&self) -> Vec<(Genre, usize)> {
        Genre::all()
            .map(|genre| (genre, self.iter().filter(|c| c.is_genre(genre)).count()))
            .collect()
    }

    /// A random composition narrowed to one random content.
    pub fn pick_one(&self) -> Result<Composition> {
        self.pick_one_with(&mut rand::thread_rng())
    }

    pub fn pick_one_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Composition> {
        let composition = self.pick_composition(rng)?;
        let index = rng.gen_range(0..composition.contents().len());
        Ok(composition.narrowed_to(index))
    }

    /// A random composition with its full content list.
    pub fn pick_one_with_all_contents(&self) -> Result<Composition> {
        self.pick_one_with_all_contents_with(&mut rand::thread_rng())
    }

    pub fn pick_one_with_all_contents_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Composition> {
        self.pick_composition(rng).cloned()
    }

    /// URL of a randomly picked content.
    pub fn random_url(&self) -> Result<String> {
        self.random_url_with(&mut rand::thread_rng())
    }

    pub fn random_url_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        let picked = self.pick_one_with(rng)?;
        Ok(picked.content(0)?.url())
    }

    /// The catalog as interchange records, in catalog order.
    #[must_use]
    pub fn records(&self) -> Vec<RawRecord> {
        self.iter().map(Composition::to_record).collect()
    }

    fn pick_composition<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Composition> {
        let index = self.playable.choose(rng).ok_or(Error::EmptyCatalog)?;
        Ok(&self.compositions[*index])
    }
}

impl FromIterator<Composition> for Catalog {
    fn from_iter<I: IntoIterator<Item = Composition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_records() -> Vec<RawRecord> {
        vec![
            RawRecord::new("Nocturne in E-flat", 9_u32)
                .with_number(2)
                .with_content("A", &["Arthur Rubinstein"]),
            RawRecord::new("Grande Valse", 18_u32),
        ]
    }

    fn build(records: Vec<RawRecord>) -> Catalog {
        let (catalog, rejected) = Catalog::build(records);
        assert!(rejected.is_empty());
        catalog
    }

    #[test]
    fn test_build_collects_rejected_records() {
        let mut records = sample_records();
        records.insert(1, RawRecord::new("Ballade", 23_u32).with_title_hash("bogus"));
        records.push(RawRecord::new("Scherzo", 20_u32).with_content("", &[]));

        let (catalog, rejected) = Catalog::build(records);
        assert_eq!(catalog.len(), 2);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].index, 1);
        assert_eq!(rejected[0].title, "Ballade");
        assert!(rejected[0].source.is_integrity());
        assert_eq!(rejected[1].index, 3);
        assert!(matches!(rejected[1].source, Error::InvalidData(_)));
    }

    #[test]
    fn test_build_strict_fails_on_first_bad_record() {
        let mut records = sample_records();
        records.push(RawRecord::new("Ballade", 23_u32).with_title_hash("bogus"));
        let err = Catalog::build_strict(records).unwrap_err();
        assert_eq!(err.index, 2);
        assert!(err.to_string().contains("Ballade"));

        assert_eq!(Catalog::build_strict(sample_records()).unwrap().len(), 2);
    }

    #[test]
    fn test_scenario_pick_and_genres() {
        let catalog = build(sample_records());
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let picked = catalog.pick_one_with(&mut rng).unwrap();
            assert_eq!(picked.title(), "Nocturne in E-flat");
            assert_eq!(picked.contents().len(), 1);
            assert_eq!(picked.contents()[0].remote_id(), "A");
        }

        assert!(catalog.by_genre(&["Waltz"]).is_empty());

        let others = catalog.by_genre(&["Others"]);
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].title(), "Grande Valse");
    }

    #[test]
    fn test_by_genre_unknown_token_reads_as_others() {
        let catalog = build(sample_records());
        assert_eq!(catalog.by_genre(&["Valse"]), catalog.by_genre(&["Others"]));
    }

    #[test]
    fn test_by_genre_preserves_duplicates() {
        let catalog = build(vec![
            RawRecord::new("Polonaise-Fantaisie", 61_u32),
            RawRecord::new("Polonaise", 53_u32),
            RawRecord::new("Grande Valse", 18_u32),
        ]);

        let mut tokens: Vec<&str> = Genre::KNOWN.iter().map(|g| g.token()).collect();
        tokens.push("Others");
        let all = catalog.by_genre(&tokens);

        // Polonaise-Fantaisie counted under Fantaisie and Polonaise
        assert_eq!(all.len(), 4);
        for composition in catalog.iter() {
            assert!(all.contains(composition));
        }

        let twice = catalog.by_genre(&["Polonaise", "Polonaise"]);
        assert_eq!(twice.len(), 4);
        assert_eq!(twice[0].title(), "Polonaise-Fantaisie");
        assert_eq!(twice[1].title(), "Polonaise");
    }

    #[test]
    fn test_restrict_to_deduplicates() {
        let catalog = build(vec![
            RawRecord::new("Polonaise-Fantaisie", 61_u32).with_content("pf", &[]),
            RawRecord::new("Nocturne", 27_u32).with_content("n", &[]),
            RawRecord::new("Fantaisie-Impromptu", 66_u32),
        ]);
        let subset = catalog.restrict_to(&[Genre::Polonaise, Genre::Fantaisie]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.playable_count(), 1);

        let mut rng = StdRng::seed_from_u64(1);
        let picked = subset.pick_one_with(&mut rng).unwrap();
        assert_eq!(picked.title(), "Polonaise-Fantaisie");
    }

    #[test]
    fn test_pick_degenerate_uniformity() {
        let mut records: Vec<RawRecord> = (1..=20_u32)
            .map(|n| RawRecord::new(format!("Mazurka {n}"), 100 + n))
            .collect();
        records.push(RawRecord::new("Barcarolle", 60_u32).with_content("only", &["Krystian Zimerman"]));
        let catalog = build(records);

        for _ in 0..10_000 {
            let picked = catalog.pick_one().unwrap();
            assert_eq!(picked.title(), "Barcarolle");
        }
    }

    #[test]
    fn test_pick_on_all_empty_catalog_fails() {
        let catalog = build(vec![RawRecord::new("Grande Valse", 18_u32)]);
        assert!(matches!(catalog.pick_one(), Err(Error::EmptyCatalog)));
        assert!(matches!(
            catalog.pick_one_with_all_contents(),
            Err(Error::EmptyCatalog)
        ));
        assert!(matches!(catalog.random_url(), Err(Error::EmptyCatalog)));
        assert!(matches!(Catalog::default().pick_one(), Err(Error::EmptyCatalog)));
    }

    #[test]
    fn test_pick_reaches_every_content() {
        let catalog = build(vec![RawRecord::new("Etude", 10_u32)
            .with_content("a", &[])
            .with_content("b", &[])
            .with_content("c", &[])]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let picked = catalog.pick_one_with(&mut rng).unwrap();
            seen.insert(picked.contents()[0].remote_id().to_string());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_pick_with_all_contents_keeps_list() {
        let catalog = build(vec![RawRecord::new("Etude", 10_u32)
            .with_content("a", &[])
            .with_content("b", &[])]);
        let picked = catalog.pick_one_with_all_contents().unwrap();
        assert_eq!(picked.contents().len(), 2);
    }

    #[test]
    fn test_random_url() {
        let catalog = build(sample_records());
        assert_eq!(catalog.random_url().unwrap(), "https://youtu.be/A");
    }

    #[test]
    fn test_pick_result_is_isolated() {
        let catalog = build(sample_records());
        let picked = catalog.pick_one().unwrap();

        let mut contents = picked.contents().to_vec();
        contents.clear();
        assert!(contents.is_empty());
        drop(picked);

        let original = catalog.iter().next().unwrap();
        assert_eq!(original.title(), "Nocturne in E-flat");
        assert_eq!(original.contents().len(), 1);
        assert_eq!(original.contents()[0].remote_id(), "A");
        assert_eq!(catalog.pick_one().unwrap().contents().len(), 1);
    }

    #[test]
    fn test_malformed_payload_record_is_rejected_alone() {
        let json = format!(
            r#"[
                {{"title": "Nocturne in E-flat", "opus": 9, "number": 2, "titleHash": "{}",
                  "contents": [{{"remoteId": "A", "artists": "Arthur Rubinstein"}}]}},
                {{"title": "Ballade", "opus": 23}},
                {{"title": "Etude", "opus": {{"bad": true}}, "titleHash": "x"}},
                {{"title": "Mazurka", "opus": -1, "titleHash": "{}"}}
            ]"#,
            crate::integrity::title_hash("Nocturne in E-flat"),
            crate::integrity::title_hash("Mazurka"),
        );
        let records = crate::record::parse_records(&json).unwrap();
        let (catalog, rejected) = Catalog::build(records);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.playable_count(), 1);
        assert_eq!(rejected.len(), 2);

        assert_eq!(rejected[0].index, 1);
        assert_eq!(rejected[0].title, "Ballade");
        assert!(rejected[0].source.is_integrity());

        assert_eq!(rejected[1].index, 2);
        assert_eq!(rejected[1].title, "Etude");
        assert!(matches!(rejected[1].source, Error::Malformed(_)));
    }

    #[test]
    fn test_records_round_trip() {
        let catalog = build(vec![
            RawRecord::new("Nocturne in E-flat", 9_u32)
                .with_number(2)
                .with_content("A", &["Arthur Rubinstein", "Ivan Moravec"]),
            RawRecord::new("Mazurka", 7_u32).with_sub_opus(1),
            RawRecord::new("Waltz in A minor", "posth."),
        ]);

        let json = crate::record::to_json(&catalog.records()).unwrap();
        let rebuilt = build(crate::record::parse_records(&json).unwrap());

        assert_eq!(rebuilt.len(), catalog.len());
        for (a, b) in catalog.iter().zip(rebuilt.iter()) {
            assert_eq!(a.display_name(), b.display_name());
            assert_eq!(a.contents(), b.contents());
        }
    }

    #[test]
    fn test_genre_counts() {
        let catalog = build(sample_records());
        let counts = catalog.genre_counts();
        assert_eq!(counts.len(), Genre::KNOWN.len() + 1);
        assert!(counts.contains(&(Genre::Nocturne, 1)));
        assert!(counts.contains(&(Genre::Waltz, 0)));
        assert_eq!(counts.last(), Some(&(Genre::Others, 1)));
    }
}
