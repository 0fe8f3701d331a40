//! Quality verdicts
//!
//! A verdict is one of four levels, ordered by how bad they are:
//!
//! ```text
//! Null < Good < Medium < Bad
//! ```
//!
//! `Null` means "nothing could be judged" and is a valid, user-visible
//! outcome rather than an error.

use core::fmt;

/// Quality verdict for one series or for a whole cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quality {
    /// Nothing could be judged
    #[default]
    Null,
    /// Value inside every configured range
    Good,
    /// Value inside the Bad range but outside the Medium range
    Medium,
    /// Value outside the Bad range
    Bad,
}

impl Quality {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Quality::Null => "Null",
            Quality::Good => "Good",
            Quality::Medium => "Medium",
            Quality::Bad => "Bad",
        }
    }

    /// True if `self` is strictly worse than `other`
    pub fn is_worse_than(&self, other: Quality) -> bool {
        *self > other
    }

    /// Fold verdicts into the worst one, `Null` when there are none
    pub fn worst<I>(qualities: I) -> Quality
    where
        I: IntoIterator<Item = Quality>,
    {
        qualities.into_iter().max().unwrap_or(Quality::Null)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Quality {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}
