use crate::pool::PoolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two interchangeable deployment environments.
///
/// The set is closed: there is no way to register a third pool at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolLabel {
    Blue,
    Green,
}

impl PoolLabel {
    pub const ALL: [PoolLabel; 2] = [PoolLabel::Blue, PoolLabel::Green];

    /// The pool that backs this one up.
    pub fn other(self) -> Self {
        match self {
            PoolLabel::Blue => PoolLabel::Green,
            PoolLabel::Green => PoolLabel::Blue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PoolLabel::Blue => "blue",
            PoolLabel::Green => "green",
        }
    }
}

impl fmt::Display for PoolLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolLabel {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "blue" => Ok(PoolLabel::Blue),
            "green" => Ok(PoolLabel::Green),
            _ => Err(PoolError::InvalidPoolSelection {
                input: s.to_string(),
            }),
        }
    }
}
