use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::Path,
};

use crate::{
    foundation::error::{HifzError, HifzResult},
    foundation::math::{PERCENT_EPSILON, approx_eq},
    layout::calibration::Calibration,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One contiguous run of a verse's words on one physical line.
pub struct Segment {
    /// Line number.
    pub line: u32,
    /// Zero-based index of the verse's first word on the line (0 = rightmost).
    pub start_word: usize,
    /// Zero-based index of the verse's last word on the line.
    pub end_word: usize,
    /// Words printed on the whole line.
    pub total_words_on_line: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Percentage-space rectangle for one [`Segment`].
pub struct VerseBox {
    /// Line number of the segment.
    pub line: u32,
    /// Top edge.
    pub top: f64,
    /// Height.
    pub height: f64,
    /// Distance from the image's left edge.
    pub left: f64,
    /// Distance from the image's right edge.
    pub right: f64,
    /// `100 - left - right`.
    pub width: f64,
}

impl VerseBox {
    /// Rectangle for `segment` under `cal`.
    ///
    /// Lines run right to left, so word 0 touches the right margin.
    pub fn for_segment(segment: &Segment, cal: &Calibration) -> Self {
        let word_width = cal.word_width(segment.total_words_on_line);
        let trailing = segment
            .total_words_on_line
            .saturating_sub(1)
            .saturating_sub(segment.end_word);
        let right = cal.margin_right + segment.start_word as f64 * word_width;
        let left = cal.margin_left + trailing as f64 * word_width;
        Self {
            line: segment.line,
            top: cal.line_top(segment.line),
            height: cal.line_height,
            left,
            right,
            width: 100.0 - left - right,
        }
    }

    /// Field-wise comparison within [`PERCENT_EPSILON`].
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.line == other.line
            && approx_eq(self.top, other.top, PERCENT_EPSILON)
            && approx_eq(self.height, other.height, PERCENT_EPSILON)
            && approx_eq(self.left, other.left, PERCENT_EPSILON)
            && approx_eq(self.right, other.right, PERCENT_EPSILON)
            && approx_eq(self.width, other.width, PERCENT_EPSILON)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Geometry of one verse on one page: one box per segment.
pub struct VerseMapEntry {
    /// Surah number.
    pub surah: u32,
    /// Verse number.
    pub verse: u32,
    /// Segments in line order.
    pub segments: Vec<Segment>,
    /// `boxes[i]` belongs to `segments[i]`.
    pub boxes: Vec<VerseBox>,
}

impl VerseMapEntry {
    /// Entry whose boxes are derived from `segments` under `cal`.
    pub fn from_segments(surah: u32, verse: u32, segments: Vec<Segment>, cal: &Calibration) -> Self {
        let boxes = compute_boxes(&segments, cal);
        Self {
            surah,
            verse,
            segments,
            boxes,
        }
    }

    /// Whether the stored boxes are exactly what `cal` produces from the segments.
    pub fn is_consistent_with(&self, cal: &Calibration) -> bool {
        self.segments.len() == self.boxes.len()
            && self
                .segments
                .iter()
                .zip(&self.boxes)
                .all(|(s, b)| VerseBox::for_segment(s, cal).approx_eq(b))
    }

    /// The segment on the verse's first line.
    pub fn first_segment(&self) -> Option<&Segment> {
        self.segments.iter().min_by_key(|s| s.line)
    }
}

/// Boxes for `segments`, one per segment, in the same order.
pub fn compute_boxes(segments: &[Segment], cal: &Calibration) -> Vec<VerseBox> {
    segments
        .iter()
        .map(|s| VerseBox::for_segment(s, cal))
        .collect()
}

/// Geometry of every verse on one page, keyed by `"surah:verse"`.
pub type PageVerseMap = BTreeMap<String, VerseMapEntry>;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Provenance of a verse-map artifact.
pub struct VerseMapMetadata {
    /// ISO-8601 generation timestamp.
    pub generated_at: String,
    /// Pages in the Mushaf, regardless of the range this artifact was built for.
    pub total_pages: u32,
    /// Calibration the boxes were computed with.
    pub layout: Calibration,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Precomputed verse geometry for the whole Mushaf.
///
/// Pages missing from `pages` simply have no verse data.
pub struct VerseMap {
    /// Provenance and calibration.
    pub metadata: VerseMapMetadata,
    /// Per-page geometry keyed by page number.
    pub pages: BTreeMap<u32, PageVerseMap>,
}

impl VerseMap {
    /// Parse an artifact from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> HifzResult<Self> {
        serde_json::from_reader(r).map_err(|e| HifzError::serde(format!("parse verse map JSON: {e}")))
    }

    /// Parse an artifact from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> HifzResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            HifzError::layout(format!("open verse map '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty JSON in the published artifact shape.
    pub fn to_json_pretty(&self) -> HifzResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HifzError::serde(format!("serialize verse map: {e}")))
    }

    /// Write the artifact, creating parent directories.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> HifzResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                HifzError::layout(format!("create output dir '{}': {e}", parent.display()))
            })?;
        }
        let f = File::create(path).map_err(|e| {
            HifzError::layout(format!("create verse map '{}': {e}", path.display()))
        })?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, self)
            .map_err(|e| HifzError::serde(format!("serialize verse map: {e}")))?;
        w.flush()
            .map_err(|e| HifzError::layout(format!("write verse map '{}': {e}", path.display())))
    }

    /// Geometry of one page.
    pub fn page(&self, page: u32) -> Option<&PageVerseMap> {
        self.pages.get(&page)
    }

    /// Geometry of one verse on one page.
    pub fn entry(&self, page: u32, verse_key: &str) -> Option<&VerseMapEntry> {
        self.page(page)?.get(verse_key)
    }

    /// Number of verse entries over all pages.
    pub fn entry_count(&self) -> usize {
        self.pages.values().map(BTreeMap::len).sum()
    }

    /// Check every entry against the metadata calibration.
    pub fn validate(&self) -> HifzResult<()> {
        self.metadata.layout.validate()?;
        for (page, entries) in &self.pages {
            for (key, entry) in entries {
                if entry.segments.len() != entry.boxes.len() {
                    return Err(HifzError::validation(format!(
                        "page {page} verse {key}: {} segments but {} boxes",
                        entry.segments.len(),
                        entry.boxes.len()
                    )));
                }
                if !entry.is_consistent_with(&self.metadata.layout) {
                    return Err(HifzError::validation(format!(
                        "page {page} verse {key}: boxes do not match segments under metadata.layout"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/verse_map/model.rs"]
mod tests;
