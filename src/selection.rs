//! Next-word selection policy.
//!
//! Candidates come in three buckets: cards already due, brand-new words,
//! and cards reviewed within the last ten minutes. Due cards win, new words
//! fill otherwise-idle time, and recently-reviewed cards surface only when
//! nothing else is left, so a short queue does not ping-pong the same word
//! back at the user.

use chrono::{DateTime, Duration, Utc};

use crate::store::CardRecord;

/// Cards reviewed within this window are deprioritized.
pub const RECENT_REVIEW_WINDOW_MINUTES: i64 = 10;

/// How many candidates the service gathers before selecting.
pub const CANDIDATE_POOL_SIZE: usize = 10;

/// Disjoint candidate buckets feeding [`select_next`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePools {
    /// Due for review and outside the recent window, earliest due first.
    pub due: Vec<CardRecord>,
    /// Words without any progress record yet.
    pub fresh: Vec<CardRecord>,
    /// Reviewed within the recent window.
    pub recent: Vec<CardRecord>,
}

impl CandidatePools {
    /// Split due-query results into due vs recently-reviewed and pass fresh
    /// records through. Relative order inside each bucket is preserved, so
    /// an earliest-due-first input stays earliest-due-first.
    pub fn partition(
        reviewed: Vec<CardRecord>,
        fresh: Vec<CardRecord>,
        now: DateTime<Utc>,
    ) -> Self {
        let cutoff = now - Duration::minutes(RECENT_REVIEW_WINDOW_MINUTES);
        let mut due = Vec::new();
        let mut recent = Vec::new();
        for record in reviewed {
            match record.card.last_reviewed_at {
                Some(last) if last > cutoff => recent.push(record),
                _ => due.push(record),
            }
        }
        Self { due, fresh, recent }
    }

    pub fn is_empty(&self) -> bool {
        self.due.is_empty() && self.fresh.is_empty() && self.recent.is_empty()
    }

    /// Total candidates across all buckets.
    pub fn len(&self) -> usize {
        self.due.len() + self.fresh.len() + self.recent.len()
    }
}

/// Pick the next card to quiz: due first, then new, then recently reviewed.
/// `None` means every bucket is empty and there is nothing to study.
pub fn select_next(pools: &CandidatePools) -> Option<&CardRecord> {
    pools
        .due
        .first()
        .or_else(|| pools.fresh.first())
        .or_else(|| pools.recent.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{UserId, WordId};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn record(word: i64, reviewed_minutes_ago: Option<i64>) -> CardRecord {
        let mut record = CardRecord::new(UserId(1), WordId(word), t0());
        record.card.last_reviewed_at =
            reviewed_minutes_ago.map(|m| t0() - Duration::minutes(m));
        record
    }

    #[test]
    fn partition_splits_on_the_recent_window() {
        let reviewed = vec![record(1, Some(30)), record(2, Some(5)), record(3, None)];
        let pools = CandidatePools::partition(reviewed, vec![record(4, None)], t0());
        assert_eq!(pools.due.iter().map(|r| r.word_id.0).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(pools.recent.iter().map(|r| r.word_id.0).collect::<Vec<_>>(), vec![2]);
        assert_eq!(pools.fresh.len(), 1);
        assert_eq!(pools.len(), 4);
    }

    #[test]
    fn window_boundary_counts_as_due() {
        // Reviewed exactly ten minutes ago: no longer "recent".
        let pools = CandidatePools::partition(
            vec![record(1, Some(RECENT_REVIEW_WINDOW_MINUTES))],
            Vec::new(),
            t0(),
        );
        assert_eq!(pools.due.len(), 1);
        assert!(pools.recent.is_empty());
    }

    #[test]
    fn due_beats_fresh_beats_recent() {
        let pools = CandidatePools {
            due: vec![record(1, Some(60))],
            fresh: vec![record(2, None)],
            recent: vec![record(3, Some(2))],
        };
        assert_eq!(select_next(&pools).map(|r| r.word_id), Some(WordId(1)));

        let pools = CandidatePools {
            due: Vec::new(),
            fresh: vec![record(2, None)],
            recent: vec![record(3, Some(2))],
        };
        assert_eq!(select_next(&pools).map(|r| r.word_id), Some(WordId(2)));

        let pools = CandidatePools {
            due: Vec::new(),
            fresh: Vec::new(),
            recent: vec![record(3, Some(2))],
        };
        assert_eq!(select_next(&pools).map(|r| r.word_id), Some(WordId(3)));
    }

    #[test]
    fn empty_pools_select_nothing() {
        let pools = CandidatePools::default();
        assert!(pools.is_empty());
        assert_eq!(select_next(&pools), None);
    }

    #[test]
    fn earliest_due_order_survives_partition() {
        let reviewed = vec![record(1, Some(30)), record(2, Some(20)), record(3, Some(40))];
        let pools = CandidatePools::partition(reviewed, Vec::new(), t0());
        assert_eq!(
            pools.due.iter().map(|r| r.word_id.0).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }
}
