//! Statistics time windows
//!
//! Callers speak the Web API vocabulary (`short_term`, `medium_term`,
//! `long_term`); the top-content query expects its own enumeration
//! (`SHORT_TERM`, `MID_TERM`, `LONG_TERM`). Unrecognized tokens are kept
//! rather than rejected and resolve to the medium window.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested statistics window
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeRange {
    /// Roughly the last four weeks
    ShortTerm,
    /// Roughly the last six months
    MediumTerm,
    /// Several years of history
    LongTerm,
    /// Any other token, kept verbatim
    Unrecognized(String),
}

/// Time range token understood by the host query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostTimeRange {
    ShortTerm,
    MidTerm,
    LongTerm,
}

impl TimeRange {
    /// Parse a caller token; never fails.
    pub fn from_token(token: &str) -> Self {
        match token {
            "short_term" => TimeRange::ShortTerm,
            "medium_term" => TimeRange::MediumTerm,
            "long_term" => TimeRange::LongTerm,
            other => TimeRange::Unrecognized(other.to_string()),
        }
    }

    pub fn as_token(&self) -> &str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
            TimeRange::Unrecognized(token) => token,
        }
    }

    /// Map to the host enumeration.
    pub fn to_host(&self) -> HostTimeRange {
        match self {
            TimeRange::ShortTerm => HostTimeRange::ShortTerm,
            TimeRange::MediumTerm => HostTimeRange::MidTerm,
            TimeRange::LongTerm => HostTimeRange::LongTerm,
            TimeRange::Unrecognized(_) => HostTimeRange::MidTerm,
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::MediumTerm
    }
}

impl From<&str> for TimeRange {
    fn from(token: &str) -> Self {
        TimeRange::from_token(token)
    }
}

impl From<String> for TimeRange {
    fn from(token: String) -> Self {
        TimeRange::from_token(&token)
    }
}

impl FromStr for TimeRange {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TimeRange::from_token(s))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl HostTimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            HostTimeRange::ShortTerm => "SHORT_TERM",
            HostTimeRange::MidTerm => "MID_TERM",
            HostTimeRange::LongTerm => "LONG_TERM",
        }
    }
}
