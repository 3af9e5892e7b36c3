use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A genre bucket.
///
/// Known genres are matched as case-sensitive substrings of a composition
/// title. Matching is not exclusive: "Polonaise-Fantaisie" is both a
/// Polonaise and a Fantaisie. A title that matches no known genre falls
/// into [`Genre::Others`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Genre {
    Ballade,
    Barcarolle,
    Berceuse,
    Bolero,
    Concerto,
    Etude,
    Fantaisie,
    Impromptu,
    Mazurka,
    Nocturne,
    Polonaise,
    Prelude,
    Rondo,
    Scherzo,
    Sonata,
    Tarantelle,
    Variations,
    Waltz,
    Others,
}

impl Genre {
    /// The closed, ordered set of known genres. Excludes [`Genre::Others`].
    pub const KNOWN: [Self; 18] = [
        Self::Ballade,
        Self::Barcarolle,
        Self::Berceuse,
        Self::Bolero,
        Self::Concerto,
        Self::Etude,
        Self::Fantaisie,
        Self::Impromptu,
        Self::Mazurka,
        Self::Nocturne,
        Self::Polonaise,
        Self::Prelude,
        Self::Rondo,
        Self::Scherzo,
        Self::Sonata,
        Self::Tarantelle,
        Self::Variations,
        Self::Waltz,
    ];

    /// Known genres followed by [`Genre::Others`].
    pub fn all() -> impl Iterator<Item = Self> {
        Self::KNOWN.into_iter().chain(std::iter::once(Self::Others))
    }

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ballade => "Ballade",
            Self::Barcarolle => "Barcarolle",
            Self::Berceuse => "Berceuse",
            Self::Bolero => "Bolero",
            Self::Concerto => "Concerto",
            Self::Etude => "Etude",
            Self::Fantaisie => "Fantaisie",
            Self::Impromptu => "Impromptu",
            Self::Mazurka => "Mazurka",
            Self::Nocturne => "Nocturne",
            Self::Polonaise => "Polonaise",
            Self::Prelude => "Prelude",
            Self::Rondo => "Rondo",
            Self::Scherzo => "Scherzo",
            Self::Sonata => "Sonata",
            Self::Tarantelle => "Tarantelle",
            Self::Variations => "Variations",
            Self::Waltz => "Waltz",
            Self::Others => "Others",
        }
    }

    /// Parse a genre token, ignoring ASCII case. Unknown tokens map to
    /// [`Genre::Others`].
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        Self::KNOWN
            .into_iter()
            .find(|genre| genre.token().eq_ignore_ascii_case(token))
            .unwrap_or(Self::Others)
    }

    /// Whether a composition titled `title` belongs to this bucket.
    #[must_use]
    pub fn matches(self, title: &str) -> bool {
        match self {
            Self::Others => !Self::KNOWN.iter().any(|genre| genre.matches(title)),
            known => title.contains(known.token()),
        }
    }

    /// Every bucket `title` belongs to, in genre order.
    #[must_use]
    pub fn classify(title: &str) -> Vec<Self> {
        let matched: Vec<Self> = Self::KNOWN
            .into_iter()
            .filter(|genre| genre.matches(title))
            .collect();
        if matched.is_empty() {
            vec![Self::Others]
        } else {
            matched
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Genre {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
