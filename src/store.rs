//! Storage seams and the in-memory reference store.
//!
//! The learning flow never talks to a database directly: vocabulary content
//! comes through [`WordStore`] and per-user progress through
//! [`ProgressStore`]. [`MemoryStore`] implements both over hash maps and
//! backs the tests; real deployments put their persistence behind the same
//! traits.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::scheduler::{MemoryCard, ReviewLog};
use crate::types::{Category, UserId, Word, WordId};

// ==================== Records ====================

/// One user's memory state for one word, the unit selection and persistence
/// work with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub user_id: UserId,
    pub word_id: WordId,
    pub card: MemoryCard,
}

impl CardRecord {
    /// Fresh record for a word the user has never seen, due at `now`.
    pub fn new(user_id: UserId, word_id: WordId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            word_id,
            card: MemoryCard::new(now),
        }
    }
}

// ==================== Traits ====================

/// Read access to vocabulary content.
pub trait WordStore {
    /// Look up one word by id.
    fn word(&self, id: WordId) -> Result<Option<Word>, StoreError>;

    /// All words in a category, in stored order.
    fn words_in_category(&self, category: Category) -> Result<Vec<Word>, StoreError>;

    /// The whole vocabulary, in stored order.
    fn all_words(&self) -> Result<Vec<Word>, StoreError>;

    /// Vocabulary size.
    fn word_count(&self) -> Result<usize, StoreError>;
}

/// Per-user learning progress persistence.
pub trait ProgressStore {
    /// The stored record for one user-word pair, if any.
    fn find_card(&self, user: UserId, word: WordId) -> Result<Option<CardRecord>, StoreError>;

    /// Records due at `now`, earliest due first, at most `limit`.
    fn due_cards(
        &self,
        user: UserId,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CardRecord>, StoreError>;

    /// Fresh records for words the user has no record for yet, at most
    /// `limit`. The records are not persisted until the first review.
    fn unseen_cards(
        &self,
        user: UserId,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CardRecord>, StoreError>;

    /// Upsert one record.
    fn save_card(&self, record: &CardRecord) -> Result<(), StoreError>;

    /// Upsert a record and append its review log entry in one step, so a
    /// graded review is either fully recorded or not at all.
    fn save_review(&self, record: &CardRecord, log: &ReviewLog) -> Result<(), StoreError>;

    /// Every stored record for the user.
    fn cards_for_user(&self, user: UserId) -> Result<Vec<CardRecord>, StoreError>;

    /// Every review log entry for the user, oldest first.
    fn review_logs(&self, user: UserId) -> Result<Vec<ReviewLog>, StoreError>;
}

// ==================== In-memory store ====================

/// Hash-map-backed store implementing both traits. Thread-safe; used by the
/// tests and small single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    words: RwLock<Vec<Word>>,
    cards: RwLock<HashMap<(UserId, WordId), CardRecord>>,
    logs: RwLock<Vec<(UserId, ReviewLog)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with vocabulary content.
    pub fn with_words(words: Vec<Word>) -> Self {
        Self {
            words: RwLock::new(words),
            ..Self::default()
        }
    }

    pub fn add_word(&self, word: Word) {
        self.words.write().push(word);
    }
}

impl WordStore for MemoryStore {
    fn word(&self, id: WordId) -> Result<Option<Word>, StoreError> {
        Ok(self.words.read().iter().find(|w| w.id == id).cloned())
    }

    fn words_in_category(&self, category: Category) -> Result<Vec<Word>, StoreError> {
        Ok(self
            .words
            .read()
            .iter()
            .filter(|w| w.category == category)
            .cloned()
            .collect())
    }

    fn all_words(&self) -> Result<Vec<Word>, StoreError> {
        Ok(self.words.read().clone())
    }

    fn word_count(&self) -> Result<usize, StoreError> {
        Ok(self.words.read().len())
    }
}

impl ProgressStore for MemoryStore {
    fn find_card(&self, user: UserId, word: WordId) -> Result<Option<CardRecord>, StoreError> {
        Ok(self.cards.read().get(&(user, word)).cloned())
    }

    fn due_cards(
        &self,
        user: UserId,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CardRecord>, StoreError> {
        let mut due: Vec<CardRecord> = self
            .cards
            .read()
            .values()
            .filter(|r| r.user_id == user && r.card.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|r| r.card.due_at);
        due.truncate(limit);
        Ok(due)
    }

    fn unseen_cards(
        &self,
        user: UserId,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CardRecord>, StoreError> {
        let cards = self.cards.read();
        Ok(self
            .words
            .read()
            .iter()
            .filter(|w| !cards.contains_key(&(user, w.id)))
            .take(limit)
            .map(|w| CardRecord::new(user, w.id, now))
            .collect())
    }

    fn save_card(&self, record: &CardRecord) -> Result<(), StoreError> {
        self.cards
            .write()
            .insert((record.user_id, record.word_id), record.clone());
        Ok(())
    }

    fn save_review(&self, record: &CardRecord, log: &ReviewLog) -> Result<(), StoreError> {
        self.save_card(record)?;
        self.logs.write().push((record.user_id, log.clone()));
        Ok(())
    }

    fn cards_for_user(&self, user: UserId) -> Result<Vec<CardRecord>, StoreError> {
        let mut records: Vec<CardRecord> = self
            .cards
            .read()
            .values()
            .filter(|r| r.user_id == user)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.word_id);
        Ok(records)
    }

    fn review_logs(&self, user: UserId) -> Result<Vec<ReviewLog>, StoreError> {
        Ok(self
            .logs
            .read()
            .iter()
            .filter(|(owner, _)| *owner == user)
            .map(|(_, log)| log.clone())
            .collect())
    }
}

// ==================== Tests ====================
