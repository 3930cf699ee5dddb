//! Step generation for one round of a drill.
//!
//! Every generator targets verses picked from the page inventory (first, last, the middle verse
//! from the geometry engine, or a random one) and emits the screens of the round in order.
//! Pages without verses produce no steps.

use crate::{
    exercise::model::{
        AudioCue, ExerciseConfig, ExerciseId, Question, Step, StepKind, StepMessage, StepUi,
        VerseRole,
    },
    foundation::math::Rng64,
    geometry::middle::middle_verse_at_line,
    layout::parser::{PageVerses, VersePosition},
    verse_map::model::PageVerseMap,
};

/// Steps of one round of `config.exercise` on `page`.
///
/// `geometry` refines the middle-verse choice; `rng` drives every random pick so a seeded
/// session replays identically.
pub fn generate_steps(
    config: &ExerciseConfig,
    page: &PageVerses,
    geometry: Option<&PageVerseMap>,
    rng: &mut Rng64,
) -> Vec<Step> {
    let middle = || middle_verse_at_line(page, geometry, config.target_line);
    match config.exercise {
        ExerciseId::RandomVerse => random_verse(config, page, rng),
        ExerciseId::SequentialStartMiddleEnd => sequential_start_middle_end(config, page, middle()),
        ExerciseId::RandomStartMiddleEnd => random_start_middle_end(page, middle(), rng),
        ExerciseId::StartVerseForward => single_reveal(VerseRole::First, page.first_verse(), true),
        ExerciseId::StartVerseBackward => {
            single_reveal(VerseRole::First, page.first_verse(), false)
        }
        ExerciseId::MiddleVerseForward => single_reveal(VerseRole::Middle, middle(), true),
        ExerciseId::MiddleVerseBackward => single_reveal(VerseRole::Middle, middle(), false),
        ExerciseId::EndVerseForward => single_reveal(VerseRole::Last, page.last_verse(), true),
        ExerciseId::EndVerseBackward => single_reveal(VerseRole::Last, page.last_verse(), false),
    }
}

fn blurred() -> StepUi {
    StepUi {
        blurred: true,
        mask_all: false,
        visible_verses: Vec::new(),
        highlighted_verse: None,
    }
}

fn masked(visible: &[String], highlight: &VersePosition) -> StepUi {
    StepUi {
        blurred: false,
        mask_all: true,
        visible_verses: visible.to_vec(),
        highlighted_verse: Some(highlight.verse_key.clone()),
    }
}

fn reveal(visible: &mut Vec<String>, verse: &VersePosition) {
    if !visible.contains(&verse.verse_key) {
        visible.push(verse.verse_key.clone());
    }
}

fn random_verse(config: &ExerciseConfig, page: &PageVerses, rng: &mut Rng64) -> Vec<Step> {
    if page.is_empty() {
        return Vec::new();
    }
    let target = &page.verses()[rng.index(page.len())];
    let mut steps = Vec::with_capacity(4);
    let mut visible = Vec::new();

    steps.push(Step {
        kind: StepKind::Listening,
        role: VerseRole::Random,
        target: target.clone(),
        question: Some(Question::LocateVerse),
        message: StepMessage::new("Listen to the verse...", "Where is it?"),
        ui: blurred(),
        audio: Some(AudioCue::for_verse(target, &config.audio_base_url)),
    });

    reveal(&mut visible, target);
    steps.push(Step {
        kind: StepKind::Revealing,
        role: VerseRole::Random,
        target: target.clone(),
        question: None,
        message: StepMessage::new("Recite the first verse", "of this page"),
        ui: masked(&visible, target),
        audio: None,
    });

    if let Some(first) = page.first_verse() {
        reveal(&mut visible, first);
        steps.push(Step {
            kind: StepKind::Revealing,
            role: VerseRole::First,
            target: first.clone(),
            question: None,
            message: StepMessage::new("Recite the last verse", "of this page"),
            ui: masked(&visible, first),
            audio: None,
        });
    }

    if let Some(last) = page.last_verse() {
        reveal(&mut visible, last);
        steps.push(Step {
            kind: StepKind::Revealing,
            role: VerseRole::Last,
            target: last.clone(),
            question: None,
            message: StepMessage::new("Next page", "Tap to continue"),
            ui: masked(&visible, last),
            audio: None,
        });
    }

    steps
}

fn sequential_start_middle_end(
    config: &ExerciseConfig,
    page: &PageVerses,
    middle: Option<&VersePosition>,
) -> Vec<Step> {
    let mut steps = Vec::with_capacity(4);
    let mut visible = Vec::new();

    if let Some(first) = page.first_verse() {
        steps.push(Step {
            kind: StepKind::Listening,
            role: VerseRole::First,
            target: first.clone(),
            question: Some(Question::LocateVerse),
            message: StepMessage::new("Listen to the first verse...", "Where is it?"),
            ui: blurred(),
            audio: Some(AudioCue::for_verse(first, &config.audio_base_url)),
        });
        reveal(&mut visible, first);
        steps.push(Step {
            kind: StepKind::Revealing,
            role: VerseRole::First,
            target: first.clone(),
            question: None,
            message: StepMessage::new(VerseRole::First.label(), "Tap to continue"),
            ui: masked(&visible, first),
            audio: None,
        });
    }

    if let Some(middle) = middle {
        reveal(&mut visible, middle);
        steps.push(Step {
            kind: StepKind::Revealing,
            role: VerseRole::Middle,
            target: middle.clone(),
            question: None,
            message: StepMessage::new(VerseRole::Middle.label(), "Tap to continue"),
            ui: masked(&visible, middle),
            audio: None,
        });
    }

    if let Some(last) = page.last_verse() {
        reveal(&mut visible, last);
        steps.push(Step {
            kind: StepKind::Revealing,
            role: VerseRole::Last,
            target: last.clone(),
            question: None,
            message: StepMessage::new(VerseRole::Last.label(), "Next page"),
            ui: masked(&visible, last),
            audio: None,
        });
    }

    steps
}

fn random_start_middle_end(
    page: &PageVerses,
    middle: Option<&VersePosition>,
    rng: &mut Rng64,
) -> Vec<Step> {
    let mut targets: Vec<(VerseRole, &VersePosition)> = [
        (VerseRole::First, page.first_verse()),
        (VerseRole::Middle, middle),
        (VerseRole::Last, page.last_verse()),
    ]
    .into_iter()
    .filter_map(|(role, v)| v.map(|v| (role, v)))
    .collect();
    rng.shuffle(&mut targets);

    let mut visible = Vec::new();
    targets
        .into_iter()
        .map(|(role, verse)| {
            reveal(&mut visible, verse);
            Step {
                kind: StepKind::Questioning,
                role,
                target: verse.clone(),
                question: Some(Question::IdentifyPage),
                message: StepMessage::new(role.label(), "Page? Verse?"),
                ui: masked(&visible, verse),
                audio: None,
            }
        })
        .collect()
}

fn single_reveal(role: VerseRole, verse: Option<&VersePosition>, forward: bool) -> Vec<Step> {
    let Some(verse) = verse else {
        return Vec::new();
    };
    let hint = if forward {
        "Tap for the next page"
    } else {
        "Tap for the previous page"
    };
    vec![Step {
        kind: StepKind::Revealing,
        role,
        target: verse.clone(),
        question: Some(Question::ReciteVerse),
        message: StepMessage::new(role.label(), hint),
        ui: masked(std::slice::from_ref(&verse.verse_key), verse),
        audio: None,
    }]
}

#[cfg(test)]
#[path = "../../tests/unit/exercise/steps.rs"]
mod tests;
