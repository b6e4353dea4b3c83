//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the level grid.
///
/// `x` grows to the right, `y` grows downwards; row 0 is the top of the level.
/// Coordinates are signed so that observation windows can address cells above
/// the first row or left of the first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell directly below this one.
    pub const fn below(self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    /// The cell directly to the right of this one.
    pub const fn right(self) -> Self {
        Self::new(self.x + 1, self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Lookup key of the value table: the tiles of a local window around the agent.
///
/// Fingerprints produced by the same [`crate::sim::ObservationWindow`] always
/// have the same length, one character per window cell in row-major order.
///
/// # Examples
///
/// ```
/// use aqtion::types::Fingerprint;
///
/// let key = Fingerprint::new("###  #");
/// assert_eq!(key.len(), 6);
/// assert_eq!(key.as_str(), "###  #");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(key: impl Into<String>) -> Self {
        Fingerprint(key.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of window cells encoded in the key.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Fingerprint {
    fn from(key: String) -> Self {
        Fingerprint(key)
    }
}

impl FromIterator<char> for Fingerprint {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Fingerprint(iter.into_iter().collect())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
