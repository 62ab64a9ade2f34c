//! # leerbot-core
//!
//! Learning engine for a Dutch vocabulary drilling bot: FSRS-style
//! scheduling, next-word selection and multiple-choice quiz generation,
//! with the chat transport, persistence and content loading kept behind
//! narrow seams.
//!
//! ## What lives here
//!
//! - **Memory model** — per-word stability, difficulty, due time and a
//!   `New -> Learning -> Review <-> Relearning` lifecycle, updated by a
//!   single pure transition function ([`scheduler`]).
//! - **Selection policy** — due words first, then unseen words, then words
//!   reviewed in the last ten minutes ([`selection`]).
//! - **Quiz builder** — four options with category-aware distractors and a
//!   cryptographically strong shuffle that degrades to a time-seeded
//!   stream instead of failing ([`quiz`], [`rng`]).
//! - **Orchestration** — [`service::LearningService`] wires the above to a
//!   storage backend and a per-user session store.
//!
//! ## Design
//!
//! - Every decision is a pure function of its inputs plus an injected
//!   randomness provider; all entry points take `now` explicitly, so
//!   nothing here reads a clock or does I/O of its own.
//! - Storage is reached only through the [`store::WordStore`] and
//!   [`store::ProgressStore`] traits; [`store::MemoryStore`] backs tests
//!   and small single-process deployments.
//! - Pending quizzes live in an explicit [`session::SessionStore`] owned
//!   by the caller, not in global state.
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use leerbot_core::{
//!     Category, LearningService, MemoryStore, Rating, UserId, Word, WordId,
//! };
//!
//! let store = MemoryStore::with_words(vec![
//!     Word::new(WordId(1), "dog", "hond", Category::Animals),
//!     Word::new(WordId(2), "cat", "kat", Category::Animals),
//!     Word::new(WordId(3), "horse", "paard", Category::Animals),
//!     Word::new(WordId(4), "bird", "vogel", Category::Animals),
//! ]);
//! let service = LearningService::new(store);
//! let user = UserId(1);
//!
//! let now = Utc::now();
//! let session = service.next_question(user, now)?;
//! let outcome = service.answer(user, session.quiz.correct_index, now)?;
//! assert!(outcome.correct);
//! service.grade(user, Rating::Good, now)?;
//! # Ok::<(), leerbot_core::LearnError>(())
//! ```

pub mod error;
pub mod quiz;
pub mod reminder;
pub mod rng;
pub mod scheduler;
pub mod selection;
pub mod service;
pub mod session;
pub mod stats;
pub mod store;
pub mod tips;
pub mod types;

pub use error::{LearnError, StoreError};
pub use quiz::{build_choices, normalize_answer, Quiz, OPTION_COUNT, WRONG_ANSWER_COUNT};
pub use reminder::{should_remind, ReminderConfig, ReminderState, UserActivity};
pub use rng::RandomSource;
pub use scheduler::{
    interval_days, retrievability, CardState, MemoryCard, Rating, ReviewLog, ReviewOutcome,
    Scheduler, SchedulerParams,
};
pub use selection::{
    select_next, CandidatePools, CANDIDATE_POOL_SIZE, RECENT_REVIEW_WINDOW_MINUTES,
};
pub use service::{AnswerOutcome, GradeOutcome, LearningService};
pub use session::{ActiveSession, SessionStore};
pub use stats::UserStats;
pub use store::{CardRecord, MemoryStore, ProgressStore, WordStore};
pub use tips::{pick_applicable, TipPolicy, DEFAULT_TIP_PERCENT};
pub use types::{Category, Direction, UserId, Word, WordId};
