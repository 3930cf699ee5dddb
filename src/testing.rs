//! Layout fixtures shared by unit tests.

use crate::layout::model::{LayoutLine, LayoutPage, LayoutWord, LineKind};

pub(crate) fn word(location: &str) -> LayoutWord {
    LayoutWord {
        location: location.to_string(),
        word: String::new(),
    }
}

/// Text line whose words are given as location strings, right to left.
pub(crate) fn text_line(line: u32, locations: &[&str]) -> LayoutLine {
    LayoutLine {
        line,
        kind: LineKind::Text,
        words: locations.iter().map(|l| word(l)).collect(),
    }
}

/// Text line holding `n` consecutive words of one verse, starting at word position `from`.
pub(crate) fn verse_run(surah: u32, verse: u32, from: u32, n: u32) -> Vec<String> {
    (from..from + n)
        .map(|p| format!("{surah}:{verse}:{p}"))
        .collect()
}

pub(crate) fn line_of(line: u32, runs: &[Vec<String>]) -> LayoutLine {
    let locations: Vec<&str> = runs.iter().flatten().map(String::as_str).collect();
    text_line(line, &locations)
}

pub(crate) fn header_line(line: u32, kind: LineKind) -> LayoutLine {
    LayoutLine {
        line,
        kind,
        words: Vec::new(),
    }
}

pub(crate) fn page(page: u32, lines: Vec<LayoutLine>) -> LayoutPage {
    LayoutPage { page, lines }
}

/// Page with 2:5 on line 5, 2:6 on lines 7-8 and 2:7 on line 9.
pub(crate) fn three_verse_page() -> LayoutPage {
    page(
        3,
        vec![
            line_of(5, &[verse_run(2, 5, 1, 6)]),
            line_of(7, &[verse_run(2, 6, 1, 6)]),
            line_of(8, &[verse_run(2, 6, 7, 6)]),
            line_of(9, &[verse_run(2, 7, 1, 6)]),
        ],
    )
}

/// Poll `done` until it holds or a few seconds pass; returns its last answer.
pub(crate) fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    while std::time::Instant::now() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    done()
}
