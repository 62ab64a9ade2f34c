//! Learning service: the orchestration seam the bot's handlers call.
//!
//! One instance serves all users. It owns no clock and no I/O beyond the
//! injected store; every entry point takes `now` explicitly so handlers,
//! tests and replays all drive it the same way.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, info};

use crate::error::LearnError;
use crate::quiz::{self, OPTION_COUNT};
use crate::rng::RandomSource;
use crate::scheduler::{Rating, ReviewLog, Scheduler};
use crate::selection::{self, CandidatePools, CANDIDATE_POOL_SIZE};
use crate::session::{ActiveSession, SessionStore};
use crate::stats::UserStats;
use crate::store::{CardRecord, ProgressStore, WordStore};
use crate::types::{Direction, UserId, Word};

/// Outcome of an answered question, before the rating is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    /// Whether the answer was correct.
    pub correct: bool,
    /// Slot of the correct option, for highlighting.
    pub correct_index: usize,
    /// The word under review, so the reply can show the full pair.
    pub word: Word,
    /// Milliseconds between question and answer.
    pub response_ms: i64,
}

/// Outcome of grading: the persisted record and its log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    pub record: CardRecord,
    pub log: ReviewLog,
}

/// Drives the learning loop for every user against one storage backend.
pub struct LearningService<S> {
    store: S,
    scheduler: Scheduler,
    sessions: SessionStore,
    rng: Mutex<RandomSource>,
}

impl<S> LearningService<S>
where
    S: WordStore + ProgressStore,
{
    /// Service with default scheduler parameters and OS randomness.
    pub fn new(store: S) -> Self {
        Self::with_parts(store, Scheduler::default(), RandomSource::strong())
    }

    /// Service with explicit scheduler and randomness; tests pass a seeded
    /// source.
    pub fn with_parts(store: S, scheduler: Scheduler, rng: RandomSource) -> Self {
        Self {
            store,
            scheduler,
            sessions: SessionStore::new(),
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Pick the next word for `user`, build its quiz and open a session,
    /// replacing any pending one.
    pub fn next_question(
        &self,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<ActiveSession, LearnError> {
        let pools = self.gather_pools(user, now)?;
        let Some(selected) = selection::select_next(&pools) else {
            debug!(user = user.0, "no candidates to study");
            return Err(LearnError::NothingToStudy);
        };
        let word_id = selected.word_id;
        let word = self
            .store
            .word(word_id)?
            .ok_or(LearnError::WordMissing(word_id))?;

        let same_category = self.store.words_in_category(word.category)?;
        let all_words = self.store.all_words()?;

        let mut rng = self.rng.lock();
        let direction = if rng.gen_range(0..2) == 0 {
            Direction::EnglishToDutch
        } else {
            Direction::DutchToEnglish
        };
        let quiz = quiz::build_choices(&word, &same_category, &all_words, direction, &mut rng)?;
        drop(rng);

        debug!(
            user = user.0,
            word = word.id.0,
            direction = direction.as_str(),
            pool = pools.len(),
            "presenting question"
        );

        let session = ActiveSession {
            user_id: user,
            word,
            direction,
            quiz,
            started_at: now,
        };
        self.sessions.begin(session.clone());
        Ok(session)
    }

    /// Assemble candidate pools: due records first, topped up with unseen
    /// words when the due queue runs short.
    fn gather_pools(
        &self,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<CandidatePools, LearnError> {
        let due = self.store.due_cards(user, now, CANDIDATE_POOL_SIZE)?;
        let fresh = if due.len() < CANDIDATE_POOL_SIZE {
            self.store
                .unseen_cards(user, now, CANDIDATE_POOL_SIZE - due.len())?
        } else {
            Vec::new()
        };
        Ok(CandidatePools::partition(due, fresh, now))
    }

    /// Check a chosen option against the pending session. The session stays
    /// open until [`LearningService::grade`] consumes it.
    pub fn answer(
        &self,
        user: UserId,
        choice_index: usize,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, LearnError> {
        if choice_index >= OPTION_COUNT {
            return Err(LearnError::InvalidChoice(choice_index));
        }
        let session = self
            .sessions
            .get(user)
            .ok_or(LearnError::NoActiveSession(user))?;
        Ok(AnswerOutcome {
            correct: session.matches_choice(choice_index),
            correct_index: session.quiz.correct_index,
            word: session.word.clone(),
            response_ms: session.response_ms(now),
        })
    }

    /// Check a typed answer against the pending session, case- and
    /// whitespace-insensitively.
    pub fn answer_text(
        &self,
        user: UserId,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, LearnError> {
        let session = self
            .sessions
            .get(user)
            .ok_or(LearnError::NoActiveSession(user))?;
        Ok(AnswerOutcome {
            correct: session.matches_text(answer),
            correct_index: session.quiz.correct_index,
            word: session.word.clone(),
            response_ms: session.response_ms(now),
        })
    }

    /// Apply the rating to the pending session's card and persist the
    /// updated record together with its log entry. Consumes the session.
    ///
    /// The record is re-read from the store rather than trusted from the
    /// session, so a question asked before an unrelated write still grades
    /// against current state.
    pub fn grade(
        &self,
        user: UserId,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<GradeOutcome, LearnError> {
        let session = self
            .sessions
            .take(user)
            .ok_or(LearnError::NoActiveSession(user))?;
        let record = match self.store.find_card(user, session.word.id)? {
            Some(record) => record,
            None => CardRecord::new(user, session.word.id, now),
        };

        let outcome = self.scheduler.review(&record.card, rating, now);
        let updated = CardRecord {
            card: outcome.card,
            ..record
        };
        self.store.save_review(&updated, &outcome.log)?;

        info!(
            user = user.0,
            word = updated.word_id.0,
            rating = rating.value(),
            state = updated.card.state.as_str(),
            due = %updated.card.due_at,
            "review recorded"
        );
        Ok(GradeOutcome {
            record: updated,
            log: outcome.log,
        })
    }

    /// Drop the pending question without grading it.
    pub fn abandon(&self, user: UserId) {
        self.sessions.end(user);
    }

    /// Current statistics for `user`.
    pub fn stats(&self, user: UserId, now: DateTime<Utc>) -> Result<UserStats, LearnError> {
        let total = self.store.word_count()?;
        let cards = self.store.cards_for_user(user)?;
        let logs = self.store.review_logs(user)?;
        Ok(UserStats::compute(total, &cards, &logs, now))
    }
}
