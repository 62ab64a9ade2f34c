//! Multiple-choice quiz generation.
//!
//! A question shows one side of a word and four options for the other side:
//! the correct translation plus three distinct wrong answers. Wrong answers
//! come from the word's own category first so options stay plausible, then
//! from the whole vocabulary when the category is too small. The correct
//! option lands in a uniformly random slot.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LearnError;
use crate::rng::RandomSource;
use crate::types::{Direction, Word};

/// Options presented per question.
pub const OPTION_COUNT: usize = 4;

/// Wrong answers needed alongside the correct one.
pub const WRONG_ANSWER_COUNT: usize = 3;

/// A four-option single-answer quiz.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quiz {
    /// The options, exactly one of which is correct.
    pub options: [String; OPTION_COUNT],
    /// Slot of the correct option.
    pub correct_index: usize,
}

impl Quiz {
    /// The correct answer text.
    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_index]
    }
}

/// Build a quiz for `target`: its translation in `direction` plus three
/// distinct wrong answers.
///
/// `same_category` is scanned first in order, then `all_words`; the target
/// and anything spelled like the correct answer are skipped in both passes.
/// The collected wrong answers are shuffled before slotting so scan order
/// does not leak into option positions.
pub fn build_choices(
    target: &Word,
    same_category: &[Word],
    all_words: &[Word],
    direction: Direction,
    rng: &mut RandomSource,
) -> Result<Quiz, LearnError> {
    let correct = target.answer_for(direction);

    let mut wrong: Vec<String> = Vec::with_capacity(WRONG_ANSWER_COUNT);
    collect_wrong_answers(&mut wrong, same_category, target, correct, direction);
    if wrong.len() < WRONG_ANSWER_COUNT {
        collect_wrong_answers(&mut wrong, all_words, target, correct, direction);
    }
    if wrong.len() < WRONG_ANSWER_COUNT {
        return Err(LearnError::NotEnoughOptions { found: wrong.len() });
    }

    wrong.shuffle(rng);
    let correct_index = rng.gen_range(0..OPTION_COUNT);

    let mut wrong = wrong.into_iter();
    let mut options: [String; OPTION_COUNT] = Default::default();
    for (slot, option) in options.iter_mut().enumerate() {
        if slot == correct_index {
            *option = correct.to_string();
        } else if let Some(answer) = wrong.next() {
            *option = answer;
        }
    }

    Ok(Quiz {
        options,
        correct_index,
    })
}

/// Scan `pool` in order, pushing distinct wrong answers until the quota is
/// met. Skips the target word, the correct spelling and anything already
/// collected.
fn collect_wrong_answers(
    into: &mut Vec<String>,
    pool: &[Word],
    target: &Word,
    correct: &str,
    direction: Direction,
) {
    for word in pool {
        if into.len() >= WRONG_ANSWER_COUNT {
            return;
        }
        if word.id == target.id {
            continue;
        }
        let candidate = word.answer_for(direction);
        if candidate == correct || into.iter().any(|existing| existing == candidate) {
            continue;
        }
        into.push(candidate.to_string());
    }
}

/// Normalization applied to typed answers before comparison: surrounding
/// whitespace dropped, case folded.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}
