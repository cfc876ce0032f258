use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::result::Result;

/// Boards the fetcher may target. Extend to open up more boards.
const VALID_BOARDS: &[&str] = &[
    "po", "g", "b", "hr", "biz", "fit", "pol", "sci", "tech", "news",
];

/// A validated board identifier.
///
/// Constructing a `Board` checks the name against the static allow-list, so
/// holding one proves the name is safe to splice into both remote URLs and
/// local directory names. Validation happens once, before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board(String);

impl Board {
    /// Validates `name` against the allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBoard`] carrying the offending name if it is
    /// not an allowed board.
    pub fn new(name: &str) -> Result<Self> {
        if VALID_BOARDS.contains(&name) {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::InvalidBoard(name.to_string()))
        }
    }

    /// Returns the board name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Board {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
