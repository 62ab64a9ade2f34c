//! Reminder eligibility policy.
//!
//! The bot nudges users when reviews pile up. The periodic timer and the
//! message delivery live outside the core; this module answers one
//! question, "should this user be reminded right now", from their reminder
//! bookkeeping and activity snapshot. Tiers, in order:
//!
//! 1. never during quiet hours, over the daily cap, or inside the minimum
//!    spacing since the previous reminder;
//! 2. never without due words, and never for users active within the last
//!    hour;
//! 3. three days of inactivity always earns a reminder;
//! 4. otherwise a large due pile reminds after six hours, a small one after
//!    twelve.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Inactivity span after which a reminder always goes out (given due
/// words).
const ALWAYS_REMIND_AFTER_DAYS: i64 = 3;
/// Users active within this window are never reminded.
const RECENT_ACTIVITY_HOURS: i64 = 1;
/// Due-card count that qualifies as a large pile.
const LARGE_PILE_THRESHOLD: usize = 5;
/// Reminder spacing for a large due pile.
const LARGE_PILE_SPACING_HOURS: i64 = 6;
/// Reminder spacing for a small due pile.
const SMALL_PILE_SPACING_HOURS: i64 = 12;

/// Tunable reminder limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Minimum spacing between two reminders, hours.
    pub min_interval_hours: i64,
    /// Start of the quiet window, hour of day.
    pub quiet_start_hour: u32,
    /// End of the quiet window, hour of day.
    pub quiet_end_hour: u32,
    /// Reminder cap per calendar day.
    pub max_per_day: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            min_interval_hours: 4,
            quiet_start_hour: 22,
            quiet_end_hour: 8,
            max_per_day: 3,
        }
    }
}

impl ReminderConfig {
    /// Whether `now` falls inside the quiet window. A window whose start is
    /// past its end wraps around midnight (the default 22 to 8); equal
    /// bounds mean no quiet window at all.
    pub fn is_quiet_time(&self, now: DateTime<Utc>) -> bool {
        let hour = now.hour();
        use std::cmp::Ordering;
        match self.quiet_start_hour.cmp(&self.quiet_end_hour) {
            Ordering::Less => hour >= self.quiet_start_hour && hour < self.quiet_end_hour,
            Ordering::Greater => hour >= self.quiet_start_hour || hour < self.quiet_end_hour,
            Ordering::Equal => false,
        }
    }
}

/// Per-user reminder bookkeeping, persisted by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderState {
    /// When the last reminder went out; `None` if never.
    pub last_sent: Option<DateTime<Utc>>,
    /// Reminders sent on the calendar day of `counted_on`.
    pub sent_today: u32,
    /// Day the counter refers to.
    pub counted_on: Option<DateTime<Utc>>,
}

impl ReminderState {
    /// Reset the daily counter when the calendar day has changed.
    pub fn roll_day(&mut self, now: DateTime<Utc>) {
        let same_day = self
            .counted_on
            .is_some_and(|day| day.date_naive() == now.date_naive());
        if !same_day {
            self.sent_today = 0;
            self.counted_on = Some(now);
        }
    }

    /// Record that a reminder went out at `now`.
    pub fn record_sent(&mut self, now: DateTime<Utc>) {
        self.roll_day(now);
        self.last_sent = Some(now);
        self.sent_today += 1;
    }
}

/// Snapshot of a user's current standing, as the policy sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserActivity {
    /// Cards currently due for review.
    pub due_words: usize,
    /// Most recent interaction with the bot.
    pub last_active: DateTime<Utc>,
}

/// Whether a reminder should go out for this user at `now`.
///
/// Rolls the daily counter on `state` as a side effect; callers pass the
/// same state they persist and call [`ReminderState::record_sent`] after an
/// actual send.
pub fn should_remind(
    config: &ReminderConfig,
    state: &mut ReminderState,
    activity: UserActivity,
    now: DateTime<Utc>,
) -> bool {
    if config.is_quiet_time(now) {
        return false;
    }

    state.roll_day(now);
    if state.sent_today >= config.max_per_day {
        return false;
    }

    if let Some(last) = state.last_sent {
        if now - last < Duration::hours(config.min_interval_hours) {
            return false;
        }
    }

    if activity.due_words == 0 {
        return false;
    }

    let inactive = now - activity.last_active;
    if inactive < Duration::hours(RECENT_ACTIVITY_HOURS) {
        return false;
    }
    if inactive >= Duration::days(ALWAYS_REMIND_AFTER_DAYS) {
        return true;
    }

    // A missing last_sent behaves like an arbitrarily old one.
    let spaced = |hours: i64| {
        state
            .last_sent
            .map_or(true, |last| now - last >= Duration::hours(hours))
    };
    if activity.due_words >= LARGE_PILE_THRESHOLD && spaced(LARGE_PILE_SPACING_HOURS) {
        return true;
    }
    if activity.due_words >= 1 && spaced(SMALL_PILE_SPACING_HOURS) {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // 13:00 UTC, comfortably outside the default quiet window.
    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap()
    }

    fn at_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn idle_user(due_words: usize, inactive_hours: i64) -> UserActivity {
        UserActivity {
            due_words,
            last_active: t0() - Duration::hours(inactive_hours),
        }
    }

    #[test]
    fn quiet_window_wraps_past_midnight() {
        let config = ReminderConfig::default();
        assert!(config.is_quiet_time(at_hour(23)));
        assert!(config.is_quiet_time(at_hour(3)));
        assert!(config.is_quiet_time(at_hour(22)));
        assert!(!config.is_quiet_time(at_hour(8)));
        assert!(!config.is_quiet_time(at_hour(13)));
    }

    #[test]
    fn same_day_quiet_window_and_empty_window() {
        let afternoon_nap = ReminderConfig {
            quiet_start_hour: 13,
            quiet_end_hour: 15,
            ..ReminderConfig::default()
        };
        assert!(afternoon_nap.is_quiet_time(at_hour(14)));
        assert!(!afternoon_nap.is_quiet_time(at_hour(15)));

        let no_window = ReminderConfig {
            quiet_start_hour: 9,
            quiet_end_hour: 9,
            ..ReminderConfig::default()
        };
        assert!(!no_window.is_quiet_time(at_hour(9)));
    }

    #[test]
    fn quiet_hours_suppress_everything() {
        let config = ReminderConfig::default();
        let mut state = ReminderState::default();
        // Three days inactive with a pile of due words, yet 23:00 is quiet.
        let user = UserActivity {
            due_words: 20,
            last_active: at_hour(23) - Duration::days(5),
        };
        assert!(!should_remind(&config, &mut state, user, at_hour(23)));
    }

    #[test]
    fn long_inactivity_always_reminds() {
        let config = ReminderConfig::default();
        let mut state = ReminderState::default();
        assert!(should_remind(&config, &mut state, idle_user(1, 72), t0()));
    }

    #[test]
    fn no_due_words_means_no_reminder() {
        let config = ReminderConfig::default();
        let mut state = ReminderState::default();
        assert!(!should_remind(&config, &mut state, idle_user(0, 100), t0()));
    }

    #[test]
    fn recently_active_users_are_left_alone() {
        let config = ReminderConfig::default();
        let mut state = ReminderState::default();
        let user = UserActivity {
            due_words: 10,
            last_active: t0() - Duration::minutes(30),
        };
        assert!(!should_remind(&config, &mut state, user, t0()));
    }

    #[test]
    fn pile_size_picks_the_spacing_tier() {
        let config = ReminderConfig::default();

        // Large pile: six hours since the last reminder is enough.
        let mut state = ReminderState {
            last_sent: Some(t0() - Duration::hours(7)),
            sent_today: 1,
            counted_on: Some(t0()),
        };
        assert!(should_remind(&config, &mut state, idle_user(5, 2), t0()));

        // Small pile: seven hours is not yet twelve.
        let mut state = ReminderState {
            last_sent: Some(t0() - Duration::hours(7)),
            sent_today: 1,
            counted_on: Some(t0()),
        };
        assert!(!should_remind(&config, &mut state, idle_user(2, 2), t0()));

        // Small pile after thirteen hours qualifies.
        let mut state = ReminderState {
            last_sent: Some(t0() - Duration::hours(13)),
            sent_today: 1,
            counted_on: Some(t0()),
        };
        assert!(should_remind(&config, &mut state, idle_user(2, 2), t0()));
    }

    #[test]
    fn minimum_spacing_blocks_early_repeats() {
        let config = ReminderConfig::default();
        let mut state = ReminderState {
            last_sent: Some(t0() - Duration::hours(2)),
            sent_today: 1,
            counted_on: Some(t0()),
        };
        assert!(!should_remind(&config, &mut state, idle_user(20, 80), t0()));
    }

    #[test]
    fn daily_cap_blocks_and_rolls_over() {
        let config = ReminderConfig::default();
        let mut state = ReminderState {
            last_sent: Some(t0() - Duration::hours(8)),
            sent_today: 3,
            counted_on: Some(t0()),
        };
        assert!(!should_remind(&config, &mut state, idle_user(9, 80), t0()));

        // Next day the counter resets and the same user qualifies.
        let tomorrow = t0() + Duration::days(1);
        let user = UserActivity {
            due_words: 9,
            last_active: tomorrow - Duration::days(4),
        };
        assert!(should_remind(&config, &mut state, user, tomorrow));
        assert_eq!(state.sent_today, 0);
    }

    #[test]
    fn record_sent_bumps_the_counter() {
        let mut state = ReminderState::default();
        state.record_sent(t0());
        state.record_sent(t0() + Duration::hours(5));
        assert_eq!(state.sent_today, 2);
        assert_eq!(state.last_sent, Some(t0() + Duration::hours(5)));

        state.record_sent(t0() + Duration::days(1));
        assert_eq!(state.sent_today, 1);
    }
}
