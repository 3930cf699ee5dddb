use std::{fmt, str::FromStr};

use crate::{
    foundation::core::{TOTAL_PAGES, is_valid_page},
    foundation::error::{HifzError, HifzResult},
    geometry::middle::DEFAULT_TARGET_LINE,
    layout::{calibration::Calibration, parser::VersePosition},
    quran::numbering,
};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
/// The nine drills.
pub enum ExerciseId {
    /// Hear a random verse, then reveal it and the page's first and last verses.
    RandomVerse,
    /// Hear the first verse, then reveal first, middle and last in order.
    SequentialStartMiddleEnd,
    /// Quiz on first, middle and last in shuffled order.
    RandomStartMiddleEnd,
    /// Reveal the first verse of each page, moving forward.
    StartVerseForward,
    /// Reveal the first verse of each page, moving backward.
    StartVerseBackward,
    /// Reveal the middle verse of each page, moving forward.
    MiddleVerseForward,
    /// Reveal the middle verse of each page, moving backward.
    MiddleVerseBackward,
    /// Reveal the last verse of each page, moving forward.
    EndVerseForward,
    /// Reveal the last verse of each page, moving backward.
    EndVerseBackward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// How a drill walks through its page range.
pub enum Progression {
    /// Start page upward.
    Forward,
    /// End page downward.
    Backward,
    /// Random spreads inside the range.
    Random,
}

impl ExerciseId {
    /// Every drill, in catalog order.
    pub const ALL: [Self; 9] = [
        Self::RandomVerse,
        Self::SequentialStartMiddleEnd,
        Self::RandomStartMiddleEnd,
        Self::StartVerseForward,
        Self::StartVerseBackward,
        Self::MiddleVerseForward,
        Self::MiddleVerseBackward,
        Self::EndVerseForward,
        Self::EndVerseBackward,
    ];

    /// Stable identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RandomVerse => "random-verse",
            Self::SequentialStartMiddleEnd => "sequential-start-middle-end",
            Self::RandomStartMiddleEnd => "random-start-middle-end",
            Self::StartVerseForward => "start-verse-forward",
            Self::StartVerseBackward => "start-verse-backward",
            Self::MiddleVerseForward => "middle-verse-forward",
            Self::MiddleVerseBackward => "middle-verse-backward",
            Self::EndVerseForward => "end-verse-forward",
            Self::EndVerseBackward => "end-verse-backward",
        }
    }

    /// Declared direction through the page range.
    pub fn progression(self) -> Progression {
        match self {
            Self::RandomVerse => Progression::Random,
            Self::StartVerseBackward | Self::MiddleVerseBackward | Self::EndVerseBackward => {
                Progression::Backward
            }
            _ => Progression::Forward,
        }
    }

    /// Whether the drill plays recitations.
    pub fn has_audio(self) -> bool {
        matches!(
            self,
            Self::RandomVerse | Self::SequentialStartMiddleEnd | Self::RandomStartMiddleEnd
        )
    }

    /// Whether each round picks one page of the spread at random and rounds jump between
    /// random spreads instead of following [`Self::progression`].
    pub fn jumps_between_spreads(self) -> bool {
        matches!(self, Self::RandomVerse | Self::RandomStartMiddleEnd)
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseId {
    type Err = HifzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| HifzError::validation(format!("unknown exercise '{s}'")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Which verse of the page a step is about.
pub enum VerseRole {
    /// First verse on the page.
    First,
    /// Middle verse (see [`crate::middle_verse`]).
    Middle,
    /// Last verse on the page.
    Last,
    /// A verse drawn at random.
    Random,
}

impl VerseRole {
    /// Label shown to the learner.
    pub fn label(self) -> &'static str {
        match self {
            Self::First => "First verse",
            Self::Middle => "Middle verse",
            Self::Last => "Last verse",
            Self::Random => "Random verse",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What the learner is asked.
pub enum Question {
    /// Recite the verse from memory.
    ReciteVerse,
    /// Say which page the verse is on.
    IdentifyPage,
    /// Say which verse it is.
    IdentifyVerse,
    /// Point to the verse on the page.
    LocateVerse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Phase of a step.
pub enum StepKind {
    /// Audio plays over a blurred page.
    Listening,
    /// Page masked except the revealed verses; learner answers.
    Questioning,
    /// A verse is uncovered.
    Revealing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Presentation directive for a step.
pub struct StepUi {
    /// Blur the whole page.
    pub blurred: bool,
    /// Mask every verse not in `visible_verses`.
    pub mask_all: bool,
    /// Verses this step reveals, in reveal order.
    pub visible_verses: Vec<String>,
    /// Verse to emphasize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_verse: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Recitation to play.
pub struct AudioCue {
    /// `"surah:verse"`.
    pub verse_key: String,
    /// Global verse number.
    pub global_number: u32,
    /// Audio file URL.
    pub url: String,
}

impl AudioCue {
    /// Cue for `verse` served from `base_url`.
    pub fn for_verse(verse: &VersePosition, base_url: &str) -> Self {
        Self {
            verse_key: verse.verse_key.clone(),
            global_number: verse.global_number,
            url: numbering::audio_url(base_url, verse.global_number),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Text shown with a step.
pub struct StepMessage {
    /// Headline.
    pub title: String,
    /// Hint line.
    pub subtitle: String,
}

impl StepMessage {
    pub(crate) fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One screen of a drill round.
pub struct Step {
    /// Phase.
    pub kind: StepKind,
    /// Which verse of the page this step targets.
    pub role: VerseRole,
    /// The targeted verse.
    pub target: VersePosition,
    /// Question asked, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
    /// Text shown.
    pub message: StepMessage,
    /// Presentation directive.
    pub ui: StepUi,
    /// Recitation to play when the step opens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioCue>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Settings for one drill session.
pub struct ExerciseConfig {
    /// Drill to run.
    pub exercise: ExerciseId,
    /// First page of the range (inclusive).
    pub start_page: u32,
    /// Last page of the range (inclusive).
    pub end_page: u32,
    /// Seed for every random choice the session makes.
    pub seed: u64,
    /// Line treated as the middle of the page.
    pub target_line: u32,
    /// Base URL for recitation files.
    pub audio_base_url: String,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            exercise: ExerciseId::RandomVerse,
            start_page: 3,
            end_page: 10,
            seed: 0,
            target_line: DEFAULT_TARGET_LINE,
            audio_base_url: numbering::DEFAULT_AUDIO_BASE_URL.to_string(),
        }
    }
}

impl ExerciseConfig {
    /// Default settings for `exercise` over `start_page..=end_page`.
    pub fn new(exercise: ExerciseId, start_page: u32, end_page: u32) -> Self {
        Self {
            exercise,
            start_page,
            end_page,
            ..Self::default()
        }
    }

    /// Reject ranges outside the book and target lines off the page.
    pub fn validate(&self) -> HifzResult<()> {
        if !is_valid_page(self.start_page) || !is_valid_page(self.end_page) {
            return Err(HifzError::validation(format!(
                "exercise pages must lie within 1..={TOTAL_PAGES}, got {}..={}",
                self.start_page, self.end_page
            )));
        }
        if self.start_page > self.end_page {
            return Err(HifzError::validation(format!(
                "exercise start page {} is after end page {}",
                self.start_page, self.end_page
            )));
        }
        let lines = Calibration::VERSE_MAP.lines_per_page;
        if !(1..=lines).contains(&self.target_line) {
            return Err(HifzError::validation(format!(
                "target line must be within 1..={lines}, got {}",
                self.target_line
            )));
        }
        Ok(())
    }

    /// Pages the session will cover.
    pub fn page_count(&self) -> u32 {
        self.end_page.saturating_sub(self.start_page) + 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/exercise/model.rs"]
mod tests;
