//! Error taxonomy for the learning core.
//!
//! Storage failures stay behind [`StoreError`] so backends can wrap whatever
//! driver error they produce; everything the learning flow itself can reject
//! is a [`LearnError`] variant the caller can match on to phrase a reply.

use thiserror::Error;

use crate::types::{UserId, WordId};

/// Failure inside a storage backend implementing the store traits.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed (I/O, SQL driver, corrupt row, ...).
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap an arbitrary backend failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Backend(Box::new(err))
    }
}

/// Errors surfaced by the learning service and its building blocks.
#[derive(Debug, Error)]
pub enum LearnError {
    /// A rating value outside 1..=4 reached the grading step.
    #[error("invalid rating value {0}, expected 1-4")]
    InvalidRating(u8),

    /// A chosen option index outside the four quiz slots.
    #[error("invalid choice index {0}, expected 0-3")]
    InvalidChoice(usize),

    /// Every candidate pool is empty; there is nothing to present.
    #[error("no words available to study")]
    NothingToStudy,

    /// The pools hold fewer than three distinct wrong answers.
    #[error("not enough distinct wrong answers for a quiz: found {found}, need 3")]
    NotEnoughOptions { found: usize },

    /// No question is pending for this user.
    #[error("no active session for user {0}")]
    NoActiveSession(UserId),

    /// A selected word id has no vocabulary entry behind it.
    #[error("word {0} not found in vocabulary")]
    WordMissing(WordId),

    /// Storage backend failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_keeps_the_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = StoreError::backend(io);
        assert!(err.to_string().contains("disk on fire"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn learn_error_messages_name_the_offender() {
        assert_eq!(
            LearnError::InvalidRating(9).to_string(),
            "invalid rating value 9, expected 1-4"
        );
        assert_eq!(
            LearnError::NoActiveSession(UserId(7)).to_string(),
            "no active session for user 7"
        );
        assert_eq!(
            LearnError::NotEnoughOptions { found: 2 }.to_string(),
            "not enough distinct wrong answers for a quiz: found 2, need 3"
        );
    }
}
