use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{
    foundation::core::{TOTAL_PAGES, is_valid_page},
    foundation::error::{HifzError, HifzResult},
    layout::{
        calibration::Calibration,
        model::LayoutPage,
        parser::{LayoutWarning, PageVerses, parse_page_verses},
        source::LayoutSource,
    },
    verse_map::{builder::page_verse_map, model::PageVerseMap},
};

#[derive(Clone, Debug, PartialEq)]
/// Everything derived from one layout document.
pub struct CachedPage {
    /// Verse inventory.
    pub verses: PageVerses,
    /// Runtime geometry, used when no verse-map artifact covers the page.
    pub geometry: PageVerseMap,
    /// Words dropped while parsing.
    pub warnings: Vec<LayoutWarning>,
}

impl CachedPage {
    /// Parse `layout` into its inventory and geometry.
    pub fn from_layout(layout: &LayoutPage) -> Self {
        let parsed = parse_page_verses(layout);
        Self {
            verses: parsed.verses,
            geometry: page_verse_map(layout, &Calibration::VERSE_MAP),
            warnings: parsed.warnings,
        }
    }
}

/// Session-scoped cache of parsed pages.
///
/// Entries are immutable once inserted; a second insert for the same page keeps the first.
/// Layout data never changes after publication, so nothing is ever evicted.
#[derive(Debug, Default)]
pub struct PageCache {
    pages: RwLock<HashMap<u32, Arc<CachedPage>>>,
}

impl PageCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached page, if present.
    pub fn get(&self, page: u32) -> Option<Arc<CachedPage>> {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&page)
            .cloned()
    }

    /// Insert unless the page is already cached; returns the entry that ends up cached.
    pub fn insert(&self, page: u32, entry: CachedPage) -> Arc<CachedPage> {
        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(pages.entry(page).or_insert_with(|| Arc::new(entry)))
    }

    /// Whether `page` is cached.
    pub fn contains(&self, page: u32) -> bool {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&page)
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.pages.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached page, loading and parsing it from `source` on a miss.
    pub fn get_or_load(&self, source: &dyn LayoutSource, page: u32) -> HifzResult<Arc<CachedPage>> {
        if !is_valid_page(page) {
            return Err(HifzError::validation(format!(
                "page must be within 1..={TOTAL_PAGES}, got {page}"
            )));
        }
        if let Some(hit) = self.get(page) {
            return Ok(hit);
        }
        // Loaded outside the lock; a racing load of the same page yields an identical entry.
        let layout = source.load_page(page)?;
        let entry = CachedPage::from_layout(&layout);
        tracing::debug!(page, verses = entry.verses.len(), "cached page");
        Ok(self.insert(page, entry))
    }

    /// Warm the two pages on each side of `page` in the background.
    ///
    /// Returns at once. Each neighbour loads on the rayon pool as its own task; a caller that
    /// has moved on simply never looks, and late results still land in the cache. Failures are
    /// logged and otherwise ignored.
    pub fn prefetch<S>(self: &Arc<Self>, source: &Arc<S>, page: u32)
    where
        S: LayoutSource + 'static,
    {
        let neighbours = [-2i64, -1, 1, 2]
            .into_iter()
            .filter_map(|d| u32::try_from(i64::from(page) + d).ok())
            .filter(|p| is_valid_page(*p) && !self.contains(*p));

        for p in neighbours {
            let cache = Arc::clone(self);
            let source = Arc::clone(source);
            rayon::spawn(move || {
                if let Err(e) = cache.get_or_load(source.as_ref(), p) {
                    tracing::debug!(page = p, error = %e, "prefetch failed");
                }
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/page_cache.rs"]
mod tests;
