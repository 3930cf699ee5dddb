use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::error::{HifzError, HifzResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One page of the Mushaf layout as published per page (`page-NNN.json`).
///
/// Line order is file order; the parser never reorders lines.
pub struct LayoutPage {
    /// Page number, `1..=604`.
    pub page: u32,
    /// Physical lines, top to bottom.
    pub lines: Vec<LayoutLine>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One printed line.
pub struct LayoutLine {
    /// Line number on the page, `1..=lines_per_page`.
    pub line: u32,
    /// What is printed on the line.
    #[serde(rename = "type")]
    pub kind: LineKind,
    /// Words of a text line, in reading (right-to-left) order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<LayoutWord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Line kind tag.
pub enum LineKind {
    /// Verse text.
    Text,
    /// Ornamental surah title.
    SurahHeader,
    /// Basmala line.
    Basmala,
    /// Any tag this crate does not know; treated like a header.
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One word as published in the layout document.
pub struct LayoutWord {
    /// Raw `"surah:verse:position"` identifier.
    pub location: String,
    /// Glyph text; unused by the geometry but kept for round-tripping.
    #[serde(default)]
    pub word: String,
}

impl LayoutLine {
    /// Whether this line participates in verse geometry.
    pub fn is_verse_text(&self) -> bool {
        self.kind == LineKind::Text && !self.words.is_empty()
    }
}

impl LayoutPage {
    /// Parse a layout document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> HifzResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| HifzError::serde(format!("parse layout page JSON: {e}")))
    }

    /// Parse a layout document from a JSON string.
    pub fn from_json_str(s: &str) -> HifzResult<Self> {
        serde_json::from_str(s).map_err(|e| HifzError::serde(format!("parse layout page JSON: {e}")))
    }

    /// Parse a layout document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> HifzResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            HifzError::layout(format!("open layout JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Lines that carry verse words.
    pub fn text_lines(&self) -> impl Iterator<Item = &LayoutLine> {
        self.lines.iter().filter(|l| l.is_verse_text())
    }
}
