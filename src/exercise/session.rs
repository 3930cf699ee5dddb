use std::{
    collections::{BTreeSet, HashSet},
    sync::Arc,
};

use crate::{
    exercise::{
        model::{ExerciseConfig, Progression, Step},
        steps::generate_steps,
    },
    foundation::core::PagePair,
    foundation::error::{HifzError, HifzResult},
    foundation::math::Rng64,
    geometry::mask::{Mask, compute_masks},
    layout::{calibration::Calibration, parser::PageVerses, source::LayoutSource},
    store::page_cache::PageCache,
    verse_map::model::{PageVerseMap, VerseMap},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Lifecycle of a session.
pub enum SessionStatus {
    /// Configured, not started.
    Idle,
    /// Accepting steps.
    Running,
    /// Temporarily stopped.
    Paused,
    /// Every page of the range has been drilled.
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Where the session is in its page range.
pub struct Progress {
    /// Page (or spread anchor) being drilled.
    pub current_page: u32,
    /// Pages finished so far.
    pub pages_completed: u32,
    /// Pages the session will drill.
    pub total_pages: u32,
    /// Rounds finished so far.
    pub rounds_completed: u32,
}

#[derive(Clone, Debug, PartialEq)]
/// Steps generated for one page.
pub struct Round {
    /// Zero-based round number.
    pub index: u32,
    /// Page the steps were generated for.
    pub page: u32,
    /// Screens of the round.
    pub steps: Vec<Step>,
    /// Index of the step on screen.
    pub current: usize,
    geometry: Option<PageVerseMap>,
}

impl Round {
    /// Step on screen, `None` once past the last one or when the page had no verses.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current)
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Result of [`ExerciseSession::advance`].
pub enum Advance {
    /// Moved to the next step of the same round.
    Step,
    /// The round ended; the next round will be on this page.
    NextPage(u32),
    /// The last page of the range has been drilled.
    Completed,
    /// Nothing to advance: no round is loaded.
    NoRound,
}

/// A drill session: rounds, page progression and what is revealed on the current spread.
///
/// The session owns no page data. Callers load a page (or let [`Self::prepare_round`] do it
/// through a [`PageCache`]) and hand it to [`Self::begin_round`].
#[derive(Clone, Debug)]
pub struct ExerciseSession {
    config: ExerciseConfig,
    status: SessionStatus,
    progress: Progress,
    round: Option<Round>,
    revealed: BTreeSet<String>,
    spread: PagePair,
    rng: Rng64,
}

impl ExerciseSession {
    /// New idle session.
    pub fn new(config: ExerciseConfig) -> HifzResult<Self> {
        config.validate()?;
        let progress = Self::initial_progress(&config);
        Ok(Self {
            spread: PagePair::for_page(progress.current_page),
            rng: Rng64::new(config.seed),
            config,
            status: SessionStatus::Idle,
            progress,
            round: None,
            revealed: BTreeSet::new(),
        })
    }

    fn initial_progress(config: &ExerciseConfig) -> Progress {
        let current_page = match config.exercise.progression() {
            Progression::Backward => config.end_page,
            Progression::Forward | Progression::Random => config.start_page,
        };
        Progress {
            current_page,
            pages_completed: 0,
            total_pages: config.page_count(),
            rounds_completed: 0,
        }
    }

    /// Settings.
    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    /// Lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Position in the page range.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Round in progress.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Spread holding the current page.
    pub fn spread(&self) -> PagePair {
        self.spread
    }

    /// Step on screen.
    pub fn current_step(&self) -> Option<&Step> {
        self.round.as_ref()?.current_step()
    }

    fn transition(&mut self, from: SessionStatus, to: SessionStatus) -> HifzResult<()> {
        if self.status != from {
            return Err(HifzError::validation(format!(
                "cannot go from {:?} to {to:?}",
                self.status
            )));
        }
        self.status = to;
        Ok(())
    }

    /// Idle to running.
    pub fn start(&mut self) -> HifzResult<()> {
        self.transition(SessionStatus::Idle, SessionStatus::Running)
    }

    /// Running to paused.
    pub fn pause(&mut self) -> HifzResult<()> {
        self.transition(SessionStatus::Running, SessionStatus::Paused)
    }

    /// Paused to running.
    pub fn resume(&mut self) -> HifzResult<()> {
        self.transition(SessionStatus::Paused, SessionStatus::Running)
    }

    /// Back to the idle state the session was created in, with the same seed.
    pub fn reset(&mut self) {
        self.status = SessionStatus::Idle;
        self.progress = Self::initial_progress(&self.config);
        self.round = None;
        self.revealed.clear();
        self.spread = PagePair::for_page(self.progress.current_page);
        self.rng = Rng64::new(self.config.seed);
    }

    fn ensure_running(&self) -> HifzResult<()> {
        if self.status != SessionStatus::Running {
            return Err(HifzError::validation(format!(
                "session is {:?}, not running",
                self.status
            )));
        }
        Ok(())
    }

    /// Page the next round should be generated for.
    ///
    /// Spread-jumping drills draw one side of the current spread (staying inside the range);
    /// the others use the current page. Consumes randomness only for spread-jumping drills.
    pub fn page_to_generate(&mut self) -> u32 {
        let current = self.progress.current_page;
        if !self.config.exercise.jumps_between_spreads() {
            return current;
        }
        let pair = PagePair::for_page(current);
        let (pick, other) = if self.rng.coin() {
            (pair.right_page, pair.left_page)
        } else {
            (pair.left_page, pair.right_page)
        };
        let in_range = |p: u32| (self.config.start_page..=self.config.end_page).contains(&p);
        if in_range(pick) {
            pick
        } else if in_range(other) {
            other
        } else {
            current
        }
    }

    /// Generate the round for `page` from its inventory and optional geometry.
    pub fn begin_round(
        &mut self,
        page: u32,
        verses: &PageVerses,
        geometry: Option<&PageVerseMap>,
    ) -> HifzResult<&Round> {
        self.ensure_running()?;
        let steps = generate_steps(&self.config, verses, geometry, &mut self.rng);
        tracing::debug!(
            exercise = %self.config.exercise,
            page,
            steps = steps.len(),
            "round generated"
        );
        let round = self.round.insert(Round {
            index: self.progress.rounds_completed,
            page,
            steps,
            current: 0,
            geometry: geometry.cloned(),
        });
        Ok(&*round)
    }

    /// Load the next page through `cache` and generate its round.
    ///
    /// Geometry comes from `verse_map` when it covers the page, otherwise from the layout
    /// itself. Neighbouring pages are prefetched in the background; only the current page is
    /// waited for.
    pub fn prepare_round<S>(
        &mut self,
        cache: &Arc<PageCache>,
        source: &Arc<S>,
        verse_map: Option<&VerseMap>,
    ) -> HifzResult<&Round>
    where
        S: LayoutSource + 'static,
    {
        self.ensure_running()?;
        let page = self.page_to_generate();
        let cached = cache.get_or_load(source.as_ref(), page)?;
        cache.prefetch(source, page);
        let geometry = verse_map
            .and_then(|m| m.page(page))
            .unwrap_or(&cached.geometry);
        self.begin_round(page, &cached.verses, Some(geometry))
    }

    /// Move to the next step, or past the round to the next page.
    ///
    /// Verses revealed by the step being left stay visible until the spread changes.
    pub fn advance(&mut self) -> HifzResult<Advance> {
        self.ensure_running()?;
        let Some(round) = self.round.as_mut() else {
            return Ok(Advance::NoRound);
        };

        if let Some(step) = round.steps.get(round.current) {
            self.revealed
                .extend(step.ui.visible_verses.iter().cloned());
        }

        if round.current + 1 < round.steps.len() {
            round.current += 1;
            return Ok(Advance::Step);
        }

        if self.progress.pages_completed + 1 >= self.progress.total_pages {
            self.progress.pages_completed = self.progress.total_pages;
            self.progress.rounds_completed += 1;
            self.round = None;
            self.status = SessionStatus::Completed;
            tracing::info!(exercise = %self.config.exercise, "session completed");
            return Ok(Advance::Completed);
        }

        let next = self.next_page();
        self.round = None;
        self.progress.current_page = next;
        self.progress.pages_completed += 1;
        self.progress.rounds_completed += 1;

        let spread = PagePair::for_page(next);
        if spread != self.spread {
            self.revealed.clear();
            self.spread = spread;
        }
        Ok(Advance::NextPage(next))
    }

    fn next_page(&mut self) -> u32 {
        let (start, end) = (self.config.start_page, self.config.end_page);
        let current = self.progress.current_page;
        if self.config.exercise.jumps_between_spreads() {
            let first_spread = (start - 1) / 2;
            let last_spread = (end - 1) / 2;
            let count = (last_spread - first_spread + 1) as usize;
            let spread = first_spread + self.rng.index(count) as u32;
            return (spread * 2 + 1).clamp(start, end);
        }
        match self.config.exercise.progression() {
            Progression::Backward => current.saturating_sub(1).max(start),
            Progression::Forward | Progression::Random => (current + 1).min(end),
        }
    }

    /// Verses visible now: the current step's plus everything already revealed on the spread.
    pub fn visible_verses(&self) -> BTreeSet<String> {
        let mut out = self.revealed.clone();
        if let Some(step) = self.current_step() {
            out.extend(step.ui.visible_verses.iter().cloned());
        }
        out
    }

    /// Masks for the page on screen.
    ///
    /// Empty unless the current step masks the page; computed with the page's odd/even
    /// calibration.
    pub fn masks(&self) -> Vec<Mask> {
        let Some(round) = self.round.as_ref() else {
            return Vec::new();
        };
        let Some(step) = round.current_step() else {
            return Vec::new();
        };
        if step.ui.blurred || !step.ui.mask_all {
            return Vec::new();
        }
        let visible: HashSet<String> = self.visible_verses().into_iter().collect();
        compute_masks(
            round.geometry.as_ref(),
            &visible,
            &Calibration::for_page(round.page),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/exercise/session.rs"]
mod tests;
