//! Verse identity: `surah:verse` keys and the global 1..=6236 verse numbering.
//!
//! The surah start offsets are derived at compile time from the per-surah verse counts, so the
//! table cannot drift from the canonical total.

/// Number of surahs.
pub const SURAH_COUNT: u32 = 114;

/// Number of verses in the whole text.
pub const TOTAL_VERSES: u32 = 6236;

/// Default recitation audio base (Al-Husary, 128 kbps), addressed by global verse number.
pub const DEFAULT_AUDIO_BASE_URL: &str = "https://cdn.islamic.network/quran/audio/128/ar.husary";

/// Verse count of each surah, index 0 = surah 1.
pub const VERSE_COUNTS: [u32; SURAH_COUNT as usize] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, 123, 111, 43, 52, 99, 128, 111, 110, 98, 135,
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, 34, 30, 73, 54, 45, 83, 182, 88, 75, 85, 54, 53,
    89, 59, 37, 35, 38, 29, 18, 45, 60, 49, 62, 55, 78, 96, 29, 22, 24, 13, 14, 11, 11, 18, 12,
    12, 30, 52, 52, 44, 28, 28, 20, 56, 40, 31, 50, 40, 46, 42, 29, 19, 36, 25, 22, 17, 19, 26,
    30, 20, 15, 21, 11, 8, 8, 19, 5, 8, 8, 11, 11, 8, 3, 9, 5, 4, 7, 3, 6, 3, 5, 4, 5, 6,
];

/// Global number of the first verse of each surah, index 0 = surah 1.
pub const SURAH_START: [u32; SURAH_COUNT as usize] = surah_starts();

const fn surah_starts() -> [u32; SURAH_COUNT as usize] {
    let mut out = [0u32; SURAH_COUNT as usize];
    let mut next = 1u32;
    let mut i = 0usize;
    while i < SURAH_COUNT as usize {
        out[i] = next;
        next += VERSE_COUNTS[i];
        i += 1;
    }
    out
}

/// Number of verses in `surah`, or `None` outside `1..=114`.
pub fn verse_count(surah: u32) -> Option<u32> {
    if !(1..=SURAH_COUNT).contains(&surah) {
        return None;
    }
    Some(VERSE_COUNTS[(surah - 1) as usize])
}

/// Global verse number of `surah:verse`, or `None` if that verse does not exist.
pub fn to_global(surah: u32, verse: u32) -> Option<u32> {
    let count = verse_count(surah)?;
    if verse == 0 || verse > count {
        return None;
    }
    Some(SURAH_START[(surah - 1) as usize] + verse - 1)
}

/// `(surah, verse)` for a global verse number, or `None` outside `1..=6236`.
pub fn from_global(global: u32) -> Option<(u32, u32)> {
    if !(1..=TOTAL_VERSES).contains(&global) {
        return None;
    }
    // Index of the last surah starting at or before `global`.
    let idx = SURAH_START.partition_point(|&start| start <= global) - 1;
    Some((idx as u32 + 1, global - SURAH_START[idx] + 1))
}

/// The `"surah:verse"` key.
pub fn verse_key(surah: u32, verse: u32) -> String {
    format!("{surah}:{verse}")
}

/// Parse a `"surah:verse"` key into its two positive components.
pub fn parse_verse_key(key: &str) -> Option<(u32, u32)> {
    let (s, v) = key.split_once(':')?;
    let surah = s.parse::<u32>().ok().filter(|&n| n > 0)?;
    let verse = v.parse::<u32>().ok().filter(|&n| n > 0)?;
    Some((surah, verse))
}

/// Recitation audio URL for a global verse number under `base`.
pub fn audio_url(base: &str, global: u32) -> String {
    format!("{}/{global}.mp3", base.trim_end_matches('/'))
}

#[cfg(test)]
#[path = "../../tests/unit/quran/numbering.rs"]
mod tests;
