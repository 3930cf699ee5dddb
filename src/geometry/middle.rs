use crate::{
    layout::parser::{PageVerses, VersePosition},
    verse_map::model::PageVerseMap,
};

/// Line treated as the visual middle of a 15-line page.
pub const DEFAULT_TARGET_LINE: u32 = 8;

const TIE_EPSILON: f64 = 1e-9;

/// Where a verse starts on its page, in lines.
///
/// Line `n` is centered on `n - 0.5`. A verse that opens its first line sits on that center;
/// one that starts partway through the line is pushed toward the next line by the fraction of
/// words printed before it. Without geometry the verse is placed on its first line's center.
pub fn effective_position(verse: &VersePosition, map: Option<&PageVerseMap>) -> Option<f64> {
    let first_line = verse.first_line()?;
    let center = f64::from(first_line) - 0.5;

    let offset = map
        .and_then(|m| m.get(&verse.verse_key))
        .and_then(|entry| entry.segments.iter().find(|s| s.line == first_line))
        .filter(|s| s.total_words_on_line > 0)
        .map(|s| s.start_word as f64 / s.total_words_on_line as f64)
        .unwrap_or(0.0);

    Some(center + offset)
}

/// The verse starting closest to the middle of the page ([`DEFAULT_TARGET_LINE`]).
pub fn middle_verse<'a>(
    page: &'a PageVerses,
    map: Option<&PageVerseMap>,
) -> Option<&'a VersePosition> {
    middle_verse_at_line(page, map, DEFAULT_TARGET_LINE)
}

/// The verse whose start is closest to the center of `target_line`.
///
/// A verse whose first line is `target_line` wins outright. Otherwise the smallest distance
/// wins; on an exact tie a verse that runs through `target_line` is preferred, then the
/// earlier verse. `None` only when the page has no verses.
pub fn middle_verse_at_line<'a>(
    page: &'a PageVerses,
    map: Option<&PageVerseMap>,
    target_line: u32,
) -> Option<&'a VersePosition> {
    let target = f64::from(target_line) - 0.5;
    let mut best: Option<(&VersePosition, f64)> = None;

    for verse in page.verses() {
        if verse.first_line() == Some(target_line) {
            return Some(verse);
        }
        let Some(pos) = effective_position(verse, map) else {
            continue;
        };
        let distance = (pos - target).abs();

        let better = match best {
            None => true,
            Some((current, best_distance)) => {
                if distance < best_distance - TIE_EPSILON {
                    true
                } else if (distance - best_distance).abs() <= TIE_EPSILON {
                    verse.occupies(target_line) && !current.occupies(target_line)
                } else {
                    false
                }
            }
        };
        if better {
            best = Some((verse, distance));
        }
    }

    best.map(|(v, _)| v)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/middle.rs"]
mod tests;
