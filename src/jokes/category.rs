//! JokeAPI category whitelist.

use std::fmt;
use std::str::FromStr;

/// A joke category accepted by the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JokeCategory {
    Programming,
    Miscellaneous,
    Dark,
    Pun,
    Spooky,
    Christmas,
    Any,
}

impl JokeCategory {
    /// Every accepted category, in canonical order.
    pub const ALL: [JokeCategory; 7] = [
        JokeCategory::Programming,
        JokeCategory::Miscellaneous,
        JokeCategory::Dark,
        JokeCategory::Pun,
        JokeCategory::Spooky,
        JokeCategory::Christmas,
        JokeCategory::Any,
    ];

    /// Canonical (provider-cased) name.
    pub fn as_str(&self) -> &'static str {
        match self {
            JokeCategory::Programming => "Programming",
            JokeCategory::Miscellaneous => "Miscellaneous",
            JokeCategory::Dark => "Dark",
            JokeCategory::Pun => "Pun",
            JokeCategory::Spooky => "Spooky",
            JokeCategory::Christmas => "Christmas",
            JokeCategory::Any => "Any",
        }
    }

    /// Join categories the way the provider expects them in the URL path.
    pub fn join(categories: &[JokeCategory]) -> String {
        categories
            .iter()
            .map(JokeCategory::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for JokeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a token is not in the whitelist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown joke category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for JokeCategory {
    type Err = UnknownCategory;

    /// Case-insensitive match against the whitelist. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        JokeCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownCategory(token.to_string()))
    }
}
