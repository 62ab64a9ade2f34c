//! FSRS-style spaced-repetition scheduler.
//!
//! Model summary:
//!
//! - Each user-word pair owns a [`MemoryCard`] tracking stability (days
//!   until recall probability decays to the retention target), difficulty
//!   (1.0..=10.0, reverting toward 5.0), the due instant and a discrete
//!   lifecycle state.
//! - [`Scheduler::review`] is the only mutation path. It maps a card, a
//!   [`Rating`] and the review instant to the successor card plus an
//!   append-only [`ReviewLog`] entry, and touches no clock of its own.
//! - Cards graduate `New -> Learning -> Review` through short in-day steps;
//!   an `Again` while in `Review` lapses the card into `Relearning`.
//!
//! The weight vector and the retention/decay constants are a calibrated
//! set; interval growth depends on their exact values, including the
//! sub-1.0 Easy multiplier in `w7`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LearnError;

// ==================== Constants ====================

/// Decay exponent of the power forgetting curve.
pub const DECAY: f64 = -0.5;
/// Curve factor chosen so retrievability is exactly 0.9 when the elapsed
/// time equals the stability.
pub const FACTOR: f64 = 19.0 / 81.0;

// ==================== Parameters ====================

/// Tunable scheduler parameters: the calibrated weight vector, the retention
/// target and the short in-day learning steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerParams {
    /// Model weights w0..w18.
    pub weights: [f64; 19],
    /// Target recall probability at the next scheduled review.
    pub desired_retention: f64,
    /// Learning-step delay after an `Again` answer, minutes.
    pub again_step_minutes: i64,
    /// Learning-step delay after a `Hard` answer, minutes.
    pub hard_step_minutes: i64,
    /// Learning-step delay after a `Good` answer on a new card, minutes.
    pub good_step_minutes: i64,
    /// Relearning delay after a lapse, minutes.
    pub relearn_step_minutes: i64,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            weights: [
                0.4072, 1.1829, 3.1262, 15.4722, // w0-w3: initial stability
                7.2102, 0.5316, // w4-w5: initial difficulty
                1.0651, 0.0234, // w6-w7: hard / easy stability multipliers
                1.616, 0.1544, 1.0824, // w8-w10: recall stability growth
                1.9813, 0.0953, // w11-w12: difficulty step and mean reversion
                0.2975, 2.2042, 0.2407, 2.9466, 0.5034,
                0.6567, // w13-w18: post-lapse calibration slots
            ],
            desired_retention: 0.9,
            again_step_minutes: 1,
            hard_step_minutes: 5,
            good_step_minutes: 10,
            relearn_step_minutes: 5,
        }
    }
}

// ==================== Ratings ====================

/// User performance rating, given after the answer is revealed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Rating {
    /// Complete blackout.
    Again = 1,
    /// Wrong, but the answer was recognized once shown.
    Hard = 2,
    /// Correct after hesitation.
    Good = 3,
    /// Perfect recall.
    Easy = 4,
}

impl Rating {
    /// Fallible conversion from the wire value 1..=4.
    pub fn from_value(value: u8) -> Result<Self, LearnError> {
        match value {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(LearnError::InvalidRating(other)),
        }
    }

    /// Numeric value, 1..=4.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Whether the answer counts as correct for statistics.
    pub fn is_correct(self) -> bool {
        self >= Rating::Good
    }

    /// Derive a rating from an answer check plus response latency, for
    /// callers that grade automatically instead of asking the user.
    pub fn from_response(correct: bool, response_ms: i64) -> Self {
        if !correct {
            Rating::Again
        } else if response_ms < 2_000 {
            Rating::Easy
        } else if response_ms < 5_000 {
            Rating::Good
        } else {
            Rating::Hard
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = LearnError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::from_value(value)
    }
}

// ==================== Card state ====================

/// Lifecycle phase of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    /// Never reviewed.
    #[default]
    New,
    /// In short learning steps, not yet graduated.
    Learning,
    /// Graduated; scheduled by the stability interval.
    Review,
    /// Lapsed out of review, relearning.
    Relearning,
}

impl CardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardState::New => "new",
            CardState::Learning => "learning",
            CardState::Review => "review",
            CardState::Relearning => "relearning",
        }
    }

    /// Parse from the storage form; `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(CardState::New),
            "learning" => Some(CardState::Learning),
            "review" => Some(CardState::Review),
            "relearning" => Some(CardState::Relearning),
            _ => None,
        }
    }

    /// Learning or relearning, the short-step phases.
    pub fn is_learning_phase(self) -> bool {
        matches!(self, CardState::Learning | CardState::Relearning)
    }
}

// ==================== Memory card ====================

/// Per user-word memory state. Mutated only through [`Scheduler::review`];
/// everything else reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCard {
    /// Estimated days until recall probability decays to the retention
    /// target.
    pub stability: f64,
    /// Intrinsic resistance to memorization, 1.0..=10.0.
    pub difficulty: f64,
    /// Next scheduled review instant.
    pub due_at: DateTime<Utc>,
    /// Most recent review instant; `None` before the first review.
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Lifecycle phase.
    pub state: CardState,
    /// Number of ratings processed so far.
    pub review_count: u32,
    /// Number of `Again` ratings received while in `Review`.
    pub lapse_count: u32,
}

impl MemoryCard {
    /// Fresh card: due immediately, neutral difficulty, never reviewed.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            stability: 1.0,
            difficulty: 5.0,
            due_at: now,
            last_reviewed_at: None,
            state: CardState::New,
            review_count: 0,
            lapse_count: 0,
        }
    }

    /// Whether the card is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }

    /// Estimated recall probability `elapsed_days` after the last review.
    pub fn retrievability(&self, elapsed_days: f64) -> f64 {
        retrievability(self.stability, elapsed_days)
    }
}

// ==================== Review log ====================

/// Append-only record of one review, kept for statistics and future
/// parameter tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
    /// The rating the user gave.
    pub rating: Rating,
    /// Whole days since the previous review; 0 for the first review.
    pub elapsed_days: i64,
    /// Whole days the previous schedule had allotted; 0 for the first
    /// review.
    pub scheduled_days: i64,
    /// Card state at review time, before the transition.
    pub state: CardState,
    /// When the review happened.
    pub reviewed_at: DateTime<Utc>,
}

/// Result of one review transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    /// The successor card.
    pub card: MemoryCard,
    /// The log entry describing the review that produced it.
    pub log: ReviewLog,
}

// ==================== Scheduler ====================

/// The card state machine. Stateless apart from its parameters; every
/// transition is a pure function of `(card, rating, now)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scheduler {
    params: SchedulerParams,
}

impl Scheduler {
    pub fn new(params: SchedulerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SchedulerParams {
        &self.params
    }

    /// Apply one review at `now` and return the successor card plus its log
    /// entry. All due dates are computed from `now`, never from a wall
    /// clock, so replaying a review history is deterministic.
    pub fn review(&self, card: &MemoryCard, rating: Rating, now: DateTime<Utc>) -> ReviewOutcome {
        let elapsed_days = card
            .last_reviewed_at
            .map(|last| (now - last).num_days().max(0))
            .unwrap_or(0);
        let scheduled_days = card
            .last_reviewed_at
            .map(|last| (card.due_at - last).num_days().max(0))
            .unwrap_or(0);

        let log = ReviewLog {
            rating,
            elapsed_days,
            scheduled_days,
            state: card.state,
            reviewed_at: now,
        };

        let mut next = card.clone();
        match card.state {
            CardState::New => self.review_new(&mut next, rating, now),
            CardState::Learning | CardState::Relearning => {
                self.review_learning(&mut next, rating, now)
            }
            CardState::Review => self.review_review(&mut next, rating, now),
        }
        next.review_count += 1;
        next.last_reviewed_at = Some(now);

        ReviewOutcome { card: next, log }
    }

    /// First-ever review: fix the initial difficulty, then either start the
    /// learning steps or, on `Easy`, graduate straight to review.
    fn review_new(&self, card: &mut MemoryCard, rating: Rating, now: DateTime<Utc>) {
        let p = &self.params;
        card.difficulty = init_difficulty(&p.weights, rating);

        match rating {
            Rating::Again => {
                card.state = CardState::Learning;
                card.due_at = now + Duration::minutes(p.again_step_minutes);
            }
            Rating::Hard => {
                card.state = CardState::Learning;
                card.due_at = now + Duration::minutes(p.hard_step_minutes);
            }
            Rating::Good => {
                card.state = CardState::Learning;
                card.due_at = now + Duration::minutes(p.good_step_minutes);
            }
            Rating::Easy => {
                card.state = CardState::Review;
                card.stability = init_stability(&p.weights, rating);
                card.due_at = now + Duration::days(interval_days(card.stability, p.desired_retention));
            }
        }
    }

    /// Learning or relearning step. `Again`/`Hard` repeat the short steps;
    /// `Good`/`Easy` graduate with the rating's initial stability.
    fn review_learning(&self, card: &mut MemoryCard, rating: Rating, now: DateTime<Utc>) {
        let p = &self.params;
        match rating {
            Rating::Again => {
                card.state = CardState::Learning;
                card.due_at = now + Duration::minutes(p.again_step_minutes);
            }
            Rating::Hard => {
                card.state = CardState::Learning;
                card.due_at = now + Duration::minutes(p.hard_step_minutes);
            }
            Rating::Good | Rating::Easy => {
                card.state = CardState::Review;
                card.stability = init_stability(&p.weights, rating);
                card.due_at = now + Duration::days(interval_days(card.stability, p.desired_retention));
            }
        }
    }

    /// Review of a graduated card. `Again` lapses into relearning without
    /// touching stability or difficulty; anything else grows stability and
    /// nudges difficulty toward the mean.
    fn review_review(&self, card: &mut MemoryCard, rating: Rating, now: DateTime<Utc>) {
        let p = &self.params;
        if rating == Rating::Again {
            card.lapse_count += 1;
            card.state = CardState::Relearning;
            card.due_at = now + Duration::minutes(p.relearn_step_minutes);
            return;
        }

        // Stability must see the pre-update difficulty.
        let stability = next_stability(
            &p.weights,
            card.difficulty,
            card.stability,
            rating,
            p.desired_retention,
        );
        let difficulty = next_difficulty(&p.weights, card.difficulty, rating);

        card.state = CardState::Review;
        card.stability = stability;
        card.difficulty = difficulty;
        card.due_at = now + Duration::days(interval_days(stability, p.desired_retention));
    }
}

// ==================== Formulas ====================

/// Initial difficulty for the first rating, clamped to at least 1.0.
fn init_difficulty(w: &[f64; 19], rating: Rating) -> f64 {
    let r = f64::from(rating.value());
    (w[4] - w[5] * (r - 3.0)).max(1.0)
}

/// Initial stability for a graduating rating, clamped to at least 0.1 days.
fn init_stability(w: &[f64; 19], rating: Rating) -> f64 {
    let r = f64::from(rating.value());
    (w[0] + w[1] * (r - 1.0)).max(0.1)
}

/// Stability after a successful review: multiplicative growth scaled by
/// difficulty, current stability and the rating multipliers in w6/w7.
fn next_stability(
    w: &[f64; 19],
    difficulty: f64,
    stability: f64,
    rating: Rating,
    desired_retention: f64,
) -> f64 {
    let hard_multiplier = if rating == Rating::Hard { w[6] } else { 1.0 };
    let easy_multiplier = if rating == Rating::Easy { w[7] } else { 1.0 };

    stability
        * (1.0
            + w[8].exp()
                * (11.0 - difficulty)
                * stability.powf(w[9])
                * ((1.0 - desired_retention) * w[10]).exp_m1()
                * hard_multiplier
                * easy_multiplier)
}

/// Difficulty after a review: linear step by the rating, then mean
/// reversion toward 5.0, clamped to 1.0..=10.0.
fn next_difficulty(w: &[f64; 19], difficulty: f64, rating: Rating) -> f64 {
    let r = f64::from(rating.value());
    let stepped = difficulty - w[11] * (r - 3.0);
    let reverted = stepped + w[12] * (5.0 - stepped);
    reverted.clamp(1.0, 10.0)
}

/// Review interval in whole days for a stability value, at least one day.
///
/// With the default 0.9 retention target the interval equals the stability
/// rounded to the nearest day.
pub fn interval_days(stability: f64, desired_retention: f64) -> i64 {
    let interval = stability * desired_retention.ln() / 0.9_f64.ln();
    interval.round().max(1.0) as i64
}

/// Estimated recall probability `elapsed_days` after the last review, on
/// the power forgetting curve `(1 + FACTOR * t / S) ^ DECAY`.
pub fn retrievability(stability: f64, elapsed_days: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    (1.0 + FACTOR * elapsed_days.max(0.0) / stability).powf(DECAY)
}

// ==================== Tests ====================
