//! Grammar-tip display policy.
//!
//! Questions occasionally carry a short grammar note. The policy decides
//! *whether* to attach one (a percentage gate rolled per question) and
//! *which* of the applicable notes to use (uniform pick). What counts as
//! applicable, and the note content itself, stay with the caller.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

/// Default share of questions that carry a tip, in percent.
pub const DEFAULT_TIP_PERCENT: u8 = 20;

/// Percentage gate for attaching tips to questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipPolicy {
    /// Share of questions that get a tip, 0..=100.
    pub show_percent: u8,
}

impl Default for TipPolicy {
    fn default() -> Self {
        Self {
            show_percent: DEFAULT_TIP_PERCENT,
        }
    }
}

impl TipPolicy {
    /// Policy with a clamped percentage.
    pub fn new(show_percent: u8) -> Self {
        Self {
            show_percent: show_percent.min(100),
        }
    }

    /// Roll the gate once.
    pub fn should_show(&self, rng: &mut RandomSource) -> bool {
        rng.gen_range(0..100) < self.show_percent
    }
}

/// Uniform pick among the tips applicable to the current word; `None` when
/// there are none.
pub fn pick_applicable<'a, T>(tips: &'a [T], rng: &mut RandomSource) -> Option<&'a T> {
    tips.choose(rng)
}
