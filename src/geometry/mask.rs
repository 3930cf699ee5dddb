use std::collections::HashSet;

use crate::{
    layout::calibration::Calibration,
    verse_map::model::{PageVerseMap, VerseBox},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One rectangle to paint over, in percent of the page image.
pub struct Mask {
    /// Top edge.
    pub top: f64,
    /// Height.
    pub height: f64,
    /// Distance from the left edge.
    pub left: f64,
    /// Distance from the right edge.
    pub right: f64,
    /// Verse the rectangle hides.
    pub verse_key: String,
}

impl Mask {
    fn from_box(b: &VerseBox, verse_key: &str) -> Self {
        Self {
            top: b.top,
            height: b.height,
            left: b.left,
            right: b.right,
            verse_key: verse_key.to_string(),
        }
    }
}

/// Masks for every segment of every verse not in `visible`, recomputed under `cal`.
///
/// One rectangle per segment; neighbours are never merged so a revealed verse sharing a line
/// keeps its exact word slots. No geometry means no masks.
pub fn compute_masks(
    map: Option<&PageVerseMap>,
    visible: &HashSet<String>,
    cal: &Calibration,
) -> Vec<Mask> {
    let Some(map) = map else {
        return Vec::new();
    };
    map.iter()
        .filter(|(key, _)| !visible.contains(*key))
        .flat_map(|(key, entry)| {
            entry
                .segments
                .iter()
                .map(move |s| Mask::from_box(&VerseBox::for_segment(s, cal), key))
        })
        .collect()
}

/// Like [`compute_masks`], but uses the boxes stored in the artifact as-is.
pub fn stored_masks(map: Option<&PageVerseMap>, visible: &HashSet<String>) -> Vec<Mask> {
    let Some(map) = map else {
        return Vec::new();
    };
    map.iter()
        .filter(|(key, _)| !visible.contains(*key))
        .flat_map(|(key, entry)| entry.boxes.iter().map(move |b| Mask::from_box(b, key)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mask.rs"]
mod tests;
