//! hifz is the page engine of a Quran memorization drill for the 604-page Medina Mushaf.
//!
//! It turns per-page layout documents into verse inventories and overlay geometry:
//!
//! - Parse a [`LayoutPage`] into [`PageVerses`] with [`parse_page_verses`]
//! - Batch the whole book into a [`VerseMap`] artifact with [`build_verse_map`]
//! - Pick a page's [`middle_verse`] and [`compute_masks`] for the verses still hidden
//! - Drive a drill with an [`ExerciseSession`]
//!
//! Geometry is expressed in percent of the scanned page image and never touches pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod exercise;
pub(crate) mod geometry;
pub(crate) mod layout;
/// Verse numbering across the whole text.
pub mod quran;
pub(crate) mod store;
pub(crate) mod verse_map;

#[cfg(test)]
mod testing;

pub use crate::foundation::core::{
    LocationError, PagePair, TOTAL_PAGES, WordLocation, is_valid_page,
};
pub use crate::foundation::error::{HifzError, HifzResult};
pub use crate::foundation::math::Rng64;

pub use crate::exercise::model::{
    AudioCue, ExerciseConfig, ExerciseId, Progression, Question, Step, StepKind, StepMessage,
    StepUi, VerseRole,
};
pub use crate::exercise::session::{Advance, ExerciseSession, Progress, Round, SessionStatus};
pub use crate::exercise::steps::generate_steps;
pub use crate::geometry::mask::{Mask, compute_masks, stored_masks};
pub use crate::geometry::middle::{
    DEFAULT_TARGET_LINE, effective_position, middle_verse, middle_verse_at_line,
};
pub use crate::layout::calibration::Calibration;
pub use crate::layout::model::{LayoutLine, LayoutPage, LayoutWord, LineKind};
pub use crate::layout::parser::{
    LayoutWarning, PageVerses, ParsedPage, VersePosition, parse_page_verses,
};
pub use crate::layout::source::{
    DirLayoutSource, LayoutSource, MemoryLayoutSource, layout_file_name,
};
pub use crate::store::page_cache::{CachedPage, PageCache};
pub use crate::verse_map::builder::{BuildOpts, BuildStats, build_verse_map, page_verse_map};
pub use crate::verse_map::model::{
    PageVerseMap, Segment, VerseBox, VerseMap, VerseMapEntry, VerseMapMetadata, compute_boxes,
};
