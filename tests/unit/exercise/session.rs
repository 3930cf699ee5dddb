use super::*;
use crate::{
    exercise::model::{ExerciseId, StepKind},
    layout::{model::LayoutPage, source::MemoryLayoutSource},
    testing::{line_of, page, three_verse_page, verse_run, wait_until},
};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

/// Page `n` holds 2:3n on line 2, 2:3n+1 on line 8 and 2:3n+2 on line 14.
fn drill_page(n: u32) -> LayoutPage {
    page(
        n,
        vec![
            line_of(2, &[verse_run(2, 3 * n, 1, 4)]),
            line_of(8, &[verse_run(2, 3 * n + 1, 1, 4)]),
            line_of(14, &[verse_run(2, 3 * n + 2, 1, 4)]),
        ],
    )
}

fn source() -> MemoryLayoutSource {
    (1..=12).map(drill_page).collect()
}

fn running(config: ExerciseConfig) -> ExerciseSession {
    let mut s = ExerciseSession::new(config).unwrap();
    s.start().unwrap();
    s
}

/// Drive a session to completion; returns the page of every round.
fn drive(session: &mut ExerciseSession, src: MemoryLayoutSource) -> Vec<u32> {
    let src = Arc::new(src);
    let cache = Arc::new(PageCache::new());
    let mut pages = Vec::new();
    for _ in 0..1000 {
        let page = session.prepare_round(&cache, &src, None).unwrap().page;
        pages.push(page);
        loop {
            match session.advance().unwrap() {
                Advance::Step => continue,
                Advance::NextPage(_) => break,
                Advance::Completed => return pages,
                Advance::NoRound => panic!("round vanished"),
            }
        }
    }
    panic!("session never completed");
}

#[test]
fn lifecycle_transitions() {
    let mut s = ExerciseSession::new(ExerciseConfig::default()).unwrap();
    assert_eq!(s.status(), SessionStatus::Idle);
    assert!(s.advance().is_err());
    assert!(s.pause().is_err());

    s.start().unwrap();
    assert!(s.start().is_err());
    s.pause().unwrap();
    assert_eq!(s.status(), SessionStatus::Paused);
    assert!(s.advance().is_err());
    s.resume().unwrap();
    assert_eq!(s.advance().unwrap(), Advance::NoRound);

    s.reset();
    assert_eq!(s.status(), SessionStatus::Idle);
    assert!(s.round().is_none());
}

#[test]
fn invalid_config_is_rejected() {
    assert!(ExerciseSession::new(ExerciseConfig::new(ExerciseId::RandomVerse, 5, 2)).is_err());
}

#[test]
fn forward_walks_each_page_once() {
    let mut s = running(ExerciseConfig::new(ExerciseId::StartVerseForward, 3, 6));
    assert_eq!(drive(&mut s, source()), vec![3, 4, 5, 6]);
    assert_eq!(s.status(), SessionStatus::Completed);
    let p = s.progress();
    assert_eq!(p.pages_completed, 4);
    assert_eq!(p.rounds_completed, 4);
    assert_eq!(p.total_pages, 4);
}

#[test]
fn backward_starts_at_end_page() {
    let mut s = running(ExerciseConfig::new(ExerciseId::EndVerseBackward, 3, 6));
    assert_eq!(s.progress().current_page, 6);
    assert_eq!(drive(&mut s, source()), vec![6, 5, 4, 3]);
}

#[test]
fn reveals_persist_across_the_spread() {
    let src = Arc::new(source());
    let cache = Arc::new(PageCache::new());
    let mut s = running(ExerciseConfig::new(ExerciseId::StartVerseForward, 3, 5));

    s.prepare_round(&cache, &src, None).unwrap();
    assert_eq!(s.visible_verses().into_iter().collect::<Vec<_>>(), vec!["2:9"]);

    assert_eq!(s.advance().unwrap(), Advance::NextPage(4));
    s.prepare_round(&cache, &src, None).unwrap();
    // Pages 3 and 4 share a spread.
    assert_eq!(
        s.visible_verses().into_iter().collect::<Vec<_>>(),
        vec!["2:12", "2:9"]
    );

    assert_eq!(s.advance().unwrap(), Advance::NextPage(5));
    s.prepare_round(&cache, &src, None).unwrap();
    assert_eq!(s.spread(), PagePair::for_page(5));
    assert_eq!(s.visible_verses().into_iter().collect::<Vec<_>>(), vec!["2:15"]);
}

#[test]
fn masks_follow_the_current_step() {
    let mut src = source();
    src.insert(three_verse_page());
    let src = Arc::new(src);
    let cache = Arc::new(PageCache::new());
    let mut s = running(ExerciseConfig::new(ExerciseId::SequentialStartMiddleEnd, 3, 4));
    s.prepare_round(&cache, &src, None).unwrap();

    assert_eq!(s.current_step().unwrap().kind, StepKind::Listening);
    assert!(s.masks().is_empty());

    assert_eq!(s.advance().unwrap(), Advance::Step);
    let masks = s.masks();
    // 2:6 spans two lines, 2:7 one.
    assert_eq!(masks.len(), 3);
    assert!(masks.iter().all(|m| m.verse_key != "2:5"));
    let cal = Calibration::for_page(3);
    assert!(masks.iter().all(|m| m.height == cal.line_height));

    s.advance().unwrap();
    s.advance().unwrap();
    assert!(s.masks().is_empty());
}

#[test]
fn artifact_geometry_is_preferred() {
    let src = Arc::new(source());
    let cache = Arc::new(PageCache::new());
    let empty_map = VerseMap {
        metadata: crate::verse_map::model::VerseMapMetadata {
            generated_at: String::new(),
            total_pages: 604,
            layout: Calibration::VERSE_MAP,
        },
        pages: [(3, PageVerseMap::new())].into_iter().collect(),
    };
    let mut s = running(ExerciseConfig::new(ExerciseId::StartVerseForward, 3, 4));
    s.prepare_round(&cache, &src, Some(&empty_map)).unwrap();
    // The artifact says page 3 has no geometry, so nothing is masked.
    assert!(s.masks().is_empty());

    s.advance().unwrap();
    s.prepare_round(&cache, &src, Some(&empty_map)).unwrap();
    // Page 4 is not in the artifact; geometry comes from the layout and hides the two
    // verses not yet revealed on the spread.
    let masks = s.masks();
    assert_eq!(masks.len(), 2);
    assert!(masks.iter().all(|m| m.verse_key == "2:13" || m.verse_key == "2:14"));
}

#[test]
fn random_spreads_stay_in_range_and_replay() {
    let config = ExerciseConfig {
        seed: 1234,
        ..ExerciseConfig::new(ExerciseId::RandomVerse, 3, 10)
    };
    let mut a = running(config.clone());
    let mut b = running(config);
    let pages_a = drive(&mut a, source());
    let pages_b = drive(&mut b, source());

    assert_eq!(pages_a.len(), 8);
    assert!(pages_a.iter().all(|p| (3..=10).contains(p)));
    assert_eq!(pages_a, pages_b);
}

#[test]
fn page_without_verses_moves_on() {
    let mut src = source();
    src.insert(page(4, Vec::new()));
    let mut s = running(ExerciseConfig::new(ExerciseId::MiddleVerseForward, 3, 5));
    assert_eq!(drive(&mut s, src), vec![3, 4, 5]);
}

#[test]
fn load_errors_surface() {
    let src = Arc::new(MemoryLayoutSource::new());
    let cache = Arc::new(PageCache::new());
    let mut s = running(ExerciseConfig::new(ExerciseId::StartVerseForward, 3, 4));
    assert!(s.prepare_round(&cache, &src, None).is_err());
    assert!(s.round().is_none());
}

/// Instant for one page, slow for every other.
struct SlowExceptOne {
    inner: MemoryLayoutSource,
    fast_page: u32,
    delay: Duration,
}

impl LayoutSource for SlowExceptOne {
    fn load_page(&self, page: u32) -> HifzResult<LayoutPage> {
        if page != self.fast_page {
            std::thread::sleep(self.delay);
        }
        self.inner.load_page(page)
    }
}

#[test]
fn round_does_not_wait_for_neighbours() {
    let delay = Duration::from_millis(400);
    let src = Arc::new(SlowExceptOne {
        inner: source(),
        fast_page: 3,
        delay,
    });
    let cache = Arc::new(PageCache::new());
    let mut s = running(ExerciseConfig::new(ExerciseId::StartVerseForward, 3, 6));

    let started = Instant::now();
    let page = s.prepare_round(&cache, &src, None).unwrap().page;
    let elapsed = started.elapsed();
    assert_eq!(page, 3);
    assert!(elapsed < delay, "round took {elapsed:?}");
    assert!(s.current_step().is_some());

    // Neighbours finish later and are still cached.
    assert!(wait_until(|| [1, 2, 4, 5].iter().all(|p| cache.contains(*p))));
}
