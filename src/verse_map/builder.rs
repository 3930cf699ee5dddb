use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::{
    foundation::core::{TOTAL_PAGES, is_valid_page},
    foundation::error::{HifzError, HifzResult},
    layout::{
        calibration::Calibration, model::LayoutPage, parser::locate_word, source::LayoutSource,
    },
    verse_map::model::{PageVerseMap, Segment, VerseMap, VerseMapEntry, VerseMapMetadata},
};

/// Geometry of every verse on one layout page.
///
/// Each text line contributes one [`Segment`] per verse found on it, spanning that verse's
/// first and last word index on the line. `total_words_on_line` counts every word on the line,
/// including words whose location cannot be resolved (they still take up space on the page).
pub fn page_verse_map(layout: &LayoutPage, cal: &Calibration) -> PageVerseMap {
    struct Run {
        key: String,
        surah: u32,
        verse: u32,
        start: usize,
        end: usize,
    }

    let mut segments: BTreeMap<String, (u32, u32, Vec<Segment>)> = BTreeMap::new();

    for line in layout.text_lines() {
        let total = line.words.len();
        let mut runs: Vec<Run> = Vec::new();

        for (idx, word) in line.words.iter().enumerate() {
            let Ok((loc, _)) = locate_word(&word.location) else {
                tracing::debug!(
                    page = layout.page,
                    line = line.line,
                    word_index = idx,
                    location = %word.location,
                    "unlocatable word left out of verse geometry"
                );
                continue;
            };
            let key = loc.verse_key();
            match runs.iter_mut().find(|r| r.key == key) {
                Some(run) => run.end = idx,
                None => runs.push(Run {
                    key,
                    surah: loc.surah,
                    verse: loc.verse,
                    start: idx,
                    end: idx,
                }),
            }
        }

        for run in runs {
            segments
                .entry(run.key)
                .or_insert_with(|| (run.surah, run.verse, Vec::new()))
                .2
                .push(Segment {
                    line: line.line,
                    start_word: run.start,
                    end_word: run.end,
                    total_words_on_line: total,
                });
        }
    }

    segments
        .into_iter()
        .map(|(key, (surah, verse, segs))| {
            let entry = VerseMapEntry::from_segments(surah, verse, segs, cal);
            (key, entry)
        })
        .collect()
}

#[derive(Clone, Debug)]
/// Options for [`build_verse_map`].
pub struct BuildOpts {
    /// First page to process (inclusive).
    pub first_page: u32,
    /// Last page to process (inclusive).
    pub last_page: u32,
    /// Calibration written into the artifact and used for every box.
    pub calibration: Calibration,
    /// Load and analyze pages on a rayon pool.
    pub parallel: bool,
    /// Worker count for the pool; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Fixed `generatedAt` stamp; the current UTC time when `None`.
    pub generated_at: Option<String>,
}

impl Default for BuildOpts {
    fn default() -> Self {
        Self {
            first_page: 1,
            last_page: TOTAL_PAGES,
            calibration: Calibration::VERSE_MAP,
            parallel: false,
            threads: None,
            generated_at: None,
        }
    }
}

impl BuildOpts {
    fn validate(&self) -> HifzResult<()> {
        if !is_valid_page(self.first_page) || !is_valid_page(self.last_page) {
            return Err(HifzError::validation(format!(
                "build page range must lie within 1..={TOTAL_PAGES}, got {}..={}",
                self.first_page, self.last_page
            )));
        }
        if self.first_page > self.last_page {
            return Err(HifzError::validation(format!(
                "build page range is empty: {}..={}",
                self.first_page, self.last_page
            )));
        }
        self.calibration.validate()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Counters reported by [`build_verse_map`].
pub struct BuildStats {
    /// Pages in the requested range.
    pub pages_requested: u32,
    /// Pages written to the artifact.
    pub pages_built: u32,
    /// Pages whose layout could not be loaded.
    pub pages_skipped: u32,
    /// Verse entries over all built pages.
    pub verses_mapped: usize,
}

/// Build the verse-map artifact for a page range.
///
/// A page whose layout cannot be loaded is logged and left out; the run only fails on invalid
/// options. Sequential and parallel builds produce identical artifacts.
#[tracing::instrument(skip(source, opts), fields(first = opts.first_page, last = opts.last_page))]
pub fn build_verse_map(
    source: &dyn LayoutSource,
    opts: &BuildOpts,
) -> HifzResult<(VerseMap, BuildStats)> {
    opts.validate()?;

    let cal = opts.calibration;
    let pages: Vec<u32> = (opts.first_page..=opts.last_page).collect();
    let analyze = |page: u32| -> (u32, Option<PageVerseMap>) {
        match source.load_page(page) {
            Ok(layout) => {
                let map = page_verse_map(&layout, &cal);
                tracing::debug!(page, verses = map.len(), "mapped page");
                (page, Some(map))
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "skipping page without layout data");
                (page, None)
            }
        }
    };

    let results: Vec<(u32, Option<PageVerseMap>)> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| pages.par_iter().map(|&p| analyze(p)).collect())
    } else {
        pages.iter().map(|&p| analyze(p)).collect()
    };

    let mut stats = BuildStats {
        pages_requested: u32::try_from(pages.len()).unwrap_or(u32::MAX),
        ..BuildStats::default()
    };
    let mut out = BTreeMap::new();
    for (page, map) in results {
        match map {
            Some(map) => {
                stats.pages_built += 1;
                stats.verses_mapped += map.len();
                out.insert(page, map);
            }
            None => stats.pages_skipped += 1,
        }
    }

    tracing::info!(
        built = stats.pages_built,
        skipped = stats.pages_skipped,
        verses = stats.verses_mapped,
        "verse map built"
    );

    let generated_at = opts.generated_at.clone().unwrap_or_else(|| {
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    });
    let map = VerseMap {
        metadata: VerseMapMetadata {
            generated_at,
            total_pages: TOTAL_PAGES,
            layout: cal,
        },
        pages: out,
    };
    Ok((map, stats))
}

fn build_thread_pool(threads: Option<usize>) -> HifzResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(HifzError::validation(
            "build 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| HifzError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/verse_map/builder.rs"]
mod tests;
