//! Identity types for players and teams.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalized player identity.
///
/// Vendor feeds spell the same player with stray casing and spacing
/// ("LeBron  James", "lebron james "). Everything the engine keys on goes
/// through this wrapper, so raw strings that normalize identically are the
/// same entity.
///
/// # Examples
///
/// ```rust
/// use daily_proj::PlayerId;
///
/// let a = PlayerId::new("  LeBron   James ");
/// let b = PlayerId::new("lebron james");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "lebron james");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Case-fold and collapse internal whitespace.
    pub fn new(raw: &str) -> Self {
        let normalized = raw
            .split_whitespace()
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl FromStr for PlayerId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Team or opponent code, trimmed and upper-cased (`"bos "` -> `"BOS"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamCode(String);

impl TeamCode {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TeamCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl FromStr for TeamCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
