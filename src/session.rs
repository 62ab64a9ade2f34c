//! Active quiz sessions.
//!
//! The bot keeps at most one pending question per user. Sessions live in an
//! explicit store owned by whoever drives the conversation; asking a new
//! question replaces whatever was pending, so an abandoned quiz can never
//! wedge a user.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::quiz::{normalize_answer, Quiz};
use crate::types::{Direction, UserId, Word};

/// A question waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub user_id: UserId,
    /// The word under review, both sides included so the reply can show the
    /// full pair.
    pub word: Word,
    pub direction: Direction,
    pub quiz: Quiz,
    /// When the question was presented; response latency is measured from
    /// here.
    pub started_at: DateTime<Utc>,
}

impl ActiveSession {
    /// Whether the chosen option index is the correct one.
    pub fn matches_choice(&self, index: usize) -> bool {
        index == self.quiz.correct_index
    }

    /// Whether a typed answer matches, ignoring case and surrounding
    /// whitespace.
    pub fn matches_text(&self, answer: &str) -> bool {
        normalize_answer(answer) == normalize_answer(self.quiz.correct_answer())
    }

    /// Milliseconds from question display to `now`, clamped at zero.
    pub fn response_ms(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_milliseconds().max(0)
    }
}

/// One pending session per user, replace-on-begin semantics. Thread-safe.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<UserId, ActiveSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session, replacing any pending one for the same user.
    pub fn begin(&self, session: ActiveSession) {
        let user = session.user_id;
        let replaced = self.inner.write().insert(user, session);
        if let Some(previous) = replaced {
            debug!(
                user = user.0,
                word = previous.word.id.0,
                "pending question replaced"
            );
        }
    }

    /// Clone of the pending session, if any.
    pub fn get(&self, user: UserId) -> Option<ActiveSession> {
        self.inner.read().get(&user).cloned()
    }

    /// Remove and return the pending session.
    pub fn take(&self, user: UserId) -> Option<ActiveSession> {
        self.inner.write().remove(&user)
    }

    /// Drop the pending session without looking at it.
    pub fn end(&self, user: UserId) {
        self.inner.write().remove(&user);
    }

    /// Number of users with a pending question.
    pub fn active_count(&self) -> usize {
        self.inner.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, WordId};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn sample_session(user: i64) -> ActiveSession {
        ActiveSession {
            user_id: UserId(user),
            word: Word::new(WordId(1), "dog", "hond", Category::Animals),
            direction: Direction::EnglishToDutch,
            quiz: Quiz {
                options: [
                    "kat".to_string(),
                    "hond".to_string(),
                    "paard".to_string(),
                    "vogel".to_string(),
                ],
                correct_index: 1,
            },
            started_at: t0(),
        }
    }

    #[test]
    fn begin_get_take_lifecycle() {
        let store = SessionStore::new();
        assert_eq!(store.get(UserId(1)), None);

        store.begin(sample_session(1));
        store.begin(sample_session(2));
        assert_eq!(store.active_count(), 2);
        assert_eq!(store.get(UserId(1)), Some(sample_session(1)));

        let taken = store.take(UserId(1));
        assert_eq!(taken, Some(sample_session(1)));
        assert_eq!(store.get(UserId(1)), None);
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn begin_replaces_the_pending_question() {
        let store = SessionStore::new();
        store.begin(sample_session(1));
        let mut replacement = sample_session(1);
        replacement.quiz.correct_index = 3;
        replacement.quiz.options.swap(1, 3);
        store.begin(replacement.clone());

        assert_eq!(store.active_count(), 1);
        assert_eq!(store.get(UserId(1)), Some(replacement));
    }

    #[test]
    fn end_is_idempotent() {
        let store = SessionStore::new();
        store.begin(sample_session(1));
        store.end(UserId(1));
        store.end(UserId(1));
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn choice_and_text_matching() {
        let session = sample_session(1);
        assert!(session.matches_choice(1));
        assert!(!session.matches_choice(0));
        assert!(session.matches_text("hond"));
        assert!(session.matches_text("  HOND "));
        assert!(!session.matches_text("kat"));
    }

    #[test]
    fn response_latency_is_clamped() {
        let session = sample_session(1);
        assert_eq!(session.response_ms(t0() + Duration::milliseconds(1500)), 1500);
        assert_eq!(session.response_ms(t0() - Duration::seconds(5)), 0);
    }
}
