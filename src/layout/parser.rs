use std::collections::{BTreeSet, HashMap};

use crate::{
    foundation::core::{LocationError, WordLocation},
    layout::model::LayoutPage,
    quran::numbering,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Presence of one verse on one page.
pub struct VersePosition {
    /// `"surah:verse"`.
    pub verse_key: String,
    /// Surah number.
    pub surah: u32,
    /// Verse number inside the surah.
    pub verse: u32,
    /// Page the verse was found on.
    pub page: u32,
    /// Lines the verse touches on this page, ascending and unique.
    pub lines: Vec<u32>,
    /// Global verse number, `1..=6236`.
    pub global_number: u32,
}

impl VersePosition {
    /// First line the verse occupies on the page.
    pub fn first_line(&self) -> Option<u32> {
        self.lines.first().copied()
    }

    /// Whether the verse touches `line`.
    pub fn occupies(&self, line: u32) -> bool {
        self.lines.binary_search(&line).is_ok()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Verse inventory of one page, ordered by global verse number.
///
/// The first and last verse are the ends of `verses`, so they can never disagree with it.
pub struct PageVerses {
    page: u32,
    verses: Vec<VersePosition>,
}

impl PageVerses {
    /// Build from arbitrary verse records: sorts by global number and drops repeated keys
    /// (first occurrence wins).
    pub fn new(page: u32, mut verses: Vec<VersePosition>) -> Self {
        verses.sort_by_key(|v| v.global_number);
        let mut seen = BTreeSet::new();
        verses.retain(|v| seen.insert(v.verse_key.clone()));
        Self { page, verses }
    }

    /// An inventory with no verses (front matter or missing data).
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            verses: Vec::new(),
        }
    }

    /// Page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Verses in ascending global order.
    pub fn verses(&self) -> &[VersePosition] {
        &self.verses
    }

    /// First verse on the page.
    pub fn first_verse(&self) -> Option<&VersePosition> {
        self.verses.first()
    }

    /// Last verse on the page.
    pub fn last_verse(&self) -> Option<&VersePosition> {
        self.verses.last()
    }

    /// Lookup by `"surah:verse"`.
    pub fn get(&self, verse_key: &str) -> Option<&VersePosition> {
        self.verses.iter().find(|v| v.verse_key == verse_key)
    }

    /// Number of verses.
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// Whether the page has no verses.
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// A word that was dropped while parsing a page.
pub struct LayoutWarning {
    /// Page being parsed.
    pub page: u32,
    /// Line the word sits on.
    pub line: u32,
    /// Zero-based index of the word on its line.
    pub word_index: usize,
    /// Raw location string.
    pub location: String,
    /// Why it was dropped.
    #[serde(serialize_with = "serialize_display")]
    pub reason: LocationError,
}

fn serialize_display<S: serde::Serializer>(
    value: &LocationError,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Parser output: the page inventory plus any words that had to be skipped.
pub struct ParsedPage {
    /// Verse inventory.
    pub verses: PageVerses,
    /// Recoverable data faults, in document order.
    pub warnings: Vec<LayoutWarning>,
}

/// Resolve a word's location to `(location, global number)`, or say why it can't be placed.
pub(crate) fn locate_word(raw: &str) -> Result<(WordLocation, u32), LocationError> {
    let loc = WordLocation::parse(raw)?;
    let global = numbering::to_global(loc.surah, loc.verse).ok_or(LocationError::UnknownVerse {
        surah: loc.surah,
        verse: loc.verse,
    })?;
    Ok((loc, global))
}

/// Turn one layout page into its verse inventory.
///
/// Header, basmala and empty lines are skipped. A word whose location cannot be resolved is
/// dropped and reported in [`ParsedPage::warnings`]; the rest of the page is still parsed.
pub fn parse_page_verses(layout: &LayoutPage) -> ParsedPage {
    struct Acc {
        surah: u32,
        verse: u32,
        global: u32,
        lines: BTreeSet<u32>,
    }

    let mut by_key: HashMap<String, Acc> = HashMap::new();
    let mut warnings = Vec::new();

    for line in layout.text_lines() {
        for (word_index, word) in line.words.iter().enumerate() {
            let (loc, global) = match locate_word(&word.location) {
                Ok(v) => v,
                Err(reason) => {
                    tracing::warn!(
                        page = layout.page,
                        line = line.line,
                        word_index,
                        location = %word.location,
                        %reason,
                        "skipping unlocatable word"
                    );
                    warnings.push(LayoutWarning {
                        page: layout.page,
                        line: line.line,
                        word_index,
                        location: word.location.clone(),
                        reason,
                    });
                    continue;
                }
            };

            by_key
                .entry(loc.verse_key())
                .or_insert_with(|| Acc {
                    surah: loc.surah,
                    verse: loc.verse,
                    global,
                    lines: BTreeSet::new(),
                })
                .lines
                .insert(line.line);
        }
    }

    let verses = by_key
        .into_iter()
        .map(|(verse_key, acc)| VersePosition {
            verse_key,
            surah: acc.surah,
            verse: acc.verse,
            page: layout.page,
            lines: acc.lines.into_iter().collect(),
            global_number: acc.global,
        })
        .collect();

    ParsedPage {
        verses: PageVerses::new(layout.page, verses),
        warnings,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/parser.rs"]
mod tests;
