use serde::{Deserialize, Serialize};
use std::fmt;

/// An opus designation.
///
/// Most works carry a plain integer, but posthumous and lettered
/// designations ("posth.", "74a") are kept as opaque tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Opus {
    Number(i64),
    Token(String),
}

impl fmt::Display for Opus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Token(token) => f.write_str(token),
        }
    }
}

impl From<u32> for Opus {
    fn from(n: u32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<i64> for Opus {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Opus {
    fn from(token: &str) -> Self {
        Self::Token(token.to_string())
    }
}

impl From<String> for Opus {
    fn from(token: String) -> Self {
        Self::Token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opus_display() {
        assert_eq!(Opus::from(9_u32).to_string(), "9");
        assert_eq!(Opus::from("posth.").to_string(), "posth.");
    }

    #[test]
    fn test_opus_deserialize_number_or_token() {
        let number: Opus = serde_json::from_str("64").unwrap();
        assert_eq!(number, Opus::Number(64));

        let token: Opus = serde_json::from_str("\"posth.\"").unwrap();
        assert_eq!(token, Opus::Token("posth.".to_string()));

        let negative: Opus = serde_json::from_str("-1").unwrap();
        assert_eq!(negative, Opus::Number(-1));
    }
}
