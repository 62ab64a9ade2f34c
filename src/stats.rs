//! Per-user learning statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduler::{CardState, ReviewLog};
use crate::store::CardRecord;

/// Aggregated learning figures for one user, computed from the stored
/// records and review log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Words in the vocabulary.
    pub total_words: usize,
    /// Words the user has no record for yet.
    pub new_words: usize,
    /// Records in the learning or relearning phase.
    pub learning_words: usize,
    /// Records in the review phase.
    pub review_words: usize,
    /// Records due at the time of the query.
    pub due_words: usize,
    /// Mean difficulty across records; 0.0 with no records.
    pub avg_difficulty: f64,
    /// Review log entries.
    pub total_reviews: usize,
    /// Entries rated Good or Easy.
    pub correct_reviews: usize,
}

impl UserStats {
    /// Aggregate from the vocabulary size, the user's records and their
    /// review log.
    pub fn compute(
        total_words: usize,
        cards: &[CardRecord],
        logs: &[ReviewLog],
        now: DateTime<Utc>,
    ) -> Self {
        let learning_words = cards
            .iter()
            .filter(|r| r.card.state.is_learning_phase())
            .count();
        let review_words = cards
            .iter()
            .filter(|r| r.card.state == CardState::Review)
            .count();
        let due_words = cards.iter().filter(|r| r.card.is_due(now)).count();
        let avg_difficulty = if cards.is_empty() {
            0.0
        } else {
            cards.iter().map(|r| r.card.difficulty).sum::<f64>() / cards.len() as f64
        };
        let correct_reviews = logs.iter().filter(|l| l.rating.is_correct()).count();

        Self {
            total_words,
            new_words: total_words.saturating_sub(cards.len()),
            learning_words,
            review_words,
            due_words,
            avg_difficulty,
            total_reviews: logs.len(),
            correct_reviews,
        }
    }

    /// Correct-review share, 0.0 with no reviews yet.
    pub fn accuracy(&self) -> f64 {
        if self.total_reviews == 0 {
            0.0
        } else {
            self.correct_reviews as f64 / self.total_reviews as f64
        }
    }
}
