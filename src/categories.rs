//! Categories
//!
//! The closed set of listing sources a catalog row can belong to.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding a [`Category`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    /// The stored discriminant does not name a category.
    #[error("unknown category discriminant: {0}")]
    UnknownDiscriminant(i16),

    /// The given name does not name a category.
    #[error("unknown category: {0}")]
    UnknownName(String),
}

/// Listing category.
///
/// Stored and serialized as its integer discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum Category {
    /// Coach outlet sale bags.
    CoachBags,

    /// FWRD sale shoes.
    FwrdShoes,

    /// FWRD sale dresses.
    FwrdDresses,

    /// FWRD sale bags.
    FwrdBags,
}

impl Category {
    /// Every category, in discriminant order.
    pub const ALL: [Self; 4] = [
        Self::CoachBags,
        Self::FwrdShoes,
        Self::FwrdDresses,
        Self::FwrdBags,
    ];

    /// Integer discriminant used by the catalog table.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::CoachBags => 0,
            Self::FwrdShoes => 1,
            Self::FwrdDresses => 2,
            Self::FwrdBags => 3,
        }
    }

    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CoachBags => "CoachBags",
            Self::FwrdShoes => "FwrdShoes",
            Self::FwrdDresses => "FwrdDresses",
            Self::FwrdBags => "FwrdBags",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl From<Category> for i16 {
    fn from(value: Category) -> Self {
        value.as_i16()
    }
}

impl TryFrom<i16> for Category {
    type Error = CategoryError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_i16() == value)
            .ok_or(CategoryError::UnknownDiscriminant(value))
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    /// Accepts the canonical name in any case, with or without `-`/`_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| CategoryError::UnknownName(s.to_string()))
    }
}
