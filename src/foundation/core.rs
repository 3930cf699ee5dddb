use std::{fmt, str::FromStr};

/// Number of pages in the Medina Mushaf.
pub const TOTAL_PAGES: u32 = 604;

/// Returns whether `page` is a real Mushaf page (`1..=604`).
pub fn is_valid_page(page: u32) -> bool {
    (1..=TOTAL_PAGES).contains(&page)
}

/// Position of a single word: `surah:verse:position`, all 1-based.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct WordLocation {
    /// Surah number.
    pub surah: u32,
    /// Verse number inside the surah.
    pub verse: u32,
    /// Word position inside the verse.
    pub position: u32,
}

/// Why a word location string could not be turned into a [`WordLocation`].
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum LocationError {
    /// The string did not split into exactly three colon-separated fields.
    #[error("expected 3 ':'-separated fields, found {0}")]
    FieldCount(usize),
    /// One of the fields is not a positive integer.
    #[error("{field} field '{value}' is not a positive integer")]
    InvalidField {
        /// Field name (`surah`, `verse` or `position`).
        field: &'static str,
        /// Raw field text.
        value: String,
    },
    /// Well-formed, but names a verse that does not exist.
    #[error("verse {surah}:{verse} does not exist")]
    UnknownVerse {
        /// Parsed surah number.
        surah: u32,
        /// Parsed verse number.
        verse: u32,
    },
}

impl WordLocation {
    /// Parse a `"surah:verse:position"` identifier.
    ///
    /// Only the shape is checked here; whether the verse exists is up to
    /// [`crate::quran::numbering::to_global`].
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let fields: Vec<&str> = raw.split(':').collect();
        if fields.len() != 3 {
            return Err(LocationError::FieldCount(fields.len()));
        }
        Ok(Self {
            surah: positive_field("surah", fields[0])?,
            verse: positive_field("verse", fields[1])?,
            position: positive_field("position", fields[2])?,
        })
    }

    /// The `"surah:verse"` key of the verse this word belongs to.
    pub fn verse_key(&self) -> String {
        crate::quran::numbering::verse_key(self.surah, self.verse)
    }
}

impl FromStr for WordLocation {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.surah, self.verse, self.position)
    }
}

fn positive_field(field: &'static str, value: &str) -> Result<u32, LocationError> {
    match value.trim().parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(LocationError::InvalidField {
            field,
            value: value.to_string(),
        }),
    }
}

/// A double-page spread as displayed right-to-left: odd page on the right, even on the left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePair {
    /// Odd page, shown on the right.
    pub right_page: u32,
    /// Even page, shown on the left.
    pub left_page: u32,
}

impl PagePair {
    /// Spread containing `page`, clamped to the Mushaf bounds.
    pub fn for_page(page: u32) -> Self {
        let right = if page % 2 == 1 {
            page
        } else {
            page.saturating_sub(1)
        };
        Self {
            right_page: right.max(1),
            left_page: (right + 1).min(TOTAL_PAGES),
        }
    }

    /// Whether `page` is one of the two pages of this spread.
    pub fn contains(self, page: u32) -> bool {
        page == self.right_page || page == self.left_page
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
