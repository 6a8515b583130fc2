//! Spaced repetition scheduling algorithm
//!
//! Four-grade, four-phase scheme in the SM-2 family: fixed short steps
//! while a card is unfamiliar (New/Learning/Relearning), multiplicative
//! ease-weighted growth once it graduates to Review, and an ease penalty
//! plus regression to Relearning when a Review recall fails.
//!
//! Every function here is a pure computation over its inputs. The current
//! instant is always injected by the caller; nothing reads the wall clock.

use chrono::{DateTime, Duration, Utc};

use super::models::{Grade, Phase, SchedulingState};

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f32 = 1.3;

/// Ease factor assigned to newly created cards
pub const INITIAL_EASE_FACTOR: f32 = 2.5;

/// Short learning step: 10 minutes, expressed in days
pub const LEARNING_STEP_DAYS: f64 = 10.0 / MINUTES_PER_DAY;

/// Longer step for Hard answers in learning and freshly lapsed cards: 30 minutes
pub const RELEARNING_STEP_DAYS: f64 = 30.0 / MINUTES_PER_DAY;

/// Interval granted when a card graduates with Good
pub const GRADUATING_INTERVAL_DAYS: f64 = 1.0;

/// Interval granted when a card jumps straight to Review with Easy
pub const EASY_INTERVAL_DAYS: f64 = 4.0;

/// Interval multiplier for Hard answers in Review
pub const HARD_INTERVAL_MULTIPLIER: f64 = 1.2;

/// Extra multiplier on top of ease for Easy answers in Review
pub const EASY_BONUS: f64 = 1.3;

const LAPSE_EASE_PENALTY: f32 = 0.20;
const HARD_EASE_PENALTY: f32 = 0.15;
const EASY_EASE_BONUS: f32 = 0.15;

/// Apply a review grade to a scheduling state.
///
/// Returns the successor state with the interval, ease, phase, and counters
/// advanced per the transition table, `due_at` recomputed as `now` plus the
/// new interval, and `last_reviewed_at` stamped. The input is untouched;
/// persisting the result is the caller's responsibility.
pub fn next_state(state: &SchedulingState, grade: Grade, now: DateTime<Utc>) -> SchedulingState {
    let mut next = state.clone();
    apply_grade(&mut next, grade);
    next.due_at = now + interval_duration(next.interval_days);
    next.last_reviewed_at = Some(now);
    next
}

/// Predict the interval `next_state` would assign for `grade`.
///
/// Depends only on the current interval and ease, never on the clock, so it
/// is safe to call any number of times per display frame.
pub fn preview_interval(state: &SchedulingState, grade: Grade) -> f64 {
    let mut next = state.clone();
    apply_grade(&mut next, grade);
    next.interval_days
}

/// Predicted intervals for all four grades, in rating order Again..Easy.
///
/// Shown to the user before they pick a grade ("Easy will show this card
/// again in 4 days").
pub fn preview_intervals(state: &SchedulingState) -> [f64; 4] {
    [
        preview_interval(state, Grade::Again),
        preview_interval(state, Grade::Hard),
        preview_interval(state, Grade::Good),
        preview_interval(state, Grade::Easy),
    ]
}

/// The phase transition table. Interval multiplications apply to the
/// pre-review interval; ease is only recomputed where the table says so.
fn apply_grade(state: &mut SchedulingState, grade: Grade) {
    match (state.phase, grade) {
        (Phase::New, Grade::Again) | (Phase::New, Grade::Hard) => {
            state.phase = Phase::Learning;
            state.interval_days = LEARNING_STEP_DAYS;
        }
        (Phase::New, Grade::Good) => {
            state.phase = Phase::Learning;
            state.interval_days = LEARNING_STEP_DAYS;
            state.repetitions = 1;
        }
        (Phase::Learning, Grade::Again) => {
            state.interval_days = LEARNING_STEP_DAYS;
            state.repetitions = 0;
        }
        (Phase::Learning, Grade::Hard) => {
            state.interval_days = RELEARNING_STEP_DAYS;
        }
        (Phase::Learning, Grade::Good) | (Phase::Relearning, Grade::Good) => {
            state.phase = Phase::Review;
            state.interval_days = GRADUATING_INTERVAL_DAYS;
            state.repetitions = 1;
        }
        (Phase::New, Grade::Easy)
        | (Phase::Learning, Grade::Easy)
        | (Phase::Relearning, Grade::Easy) => {
            state.phase = Phase::Review;
            state.interval_days = EASY_INTERVAL_DAYS;
            state.repetitions = 1;
        }
        (Phase::Review, Grade::Again) => {
            // Lapse: regression out of the consolidated state
            state.phase = Phase::Relearning;
            state.lapses += 1;
            state.repetitions = 0;
            state.ease_factor = (state.ease_factor - LAPSE_EASE_PENALTY).max(MIN_EASE_FACTOR);
            state.interval_days = RELEARNING_STEP_DAYS;
        }
        (Phase::Review, Grade::Hard) => {
            state.interval_days *= HARD_INTERVAL_MULTIPLIER;
            state.ease_factor = (state.ease_factor - HARD_EASE_PENALTY).max(MIN_EASE_FACTOR);
        }
        (Phase::Review, Grade::Good) => {
            state.interval_days *= state.ease_factor as f64;
            state.repetitions += 1;
        }
        (Phase::Review, Grade::Easy) => {
            state.interval_days *= state.ease_factor as f64 * EASY_BONUS;
            state.ease_factor += EASY_EASE_BONUS;
            state.repetitions += 1;
        }
        (Phase::Relearning, Grade::Again) => {
            state.interval_days = LEARNING_STEP_DAYS;
            state.ease_factor = (state.ease_factor - LAPSE_EASE_PENALTY).max(MIN_EASE_FACTOR);
        }
        (Phase::Relearning, Grade::Hard) => {
            state.interval_days = RELEARNING_STEP_DAYS;
        }
    }
}

fn interval_duration(days: f64) -> Duration {
    Duration::milliseconds((days * 24.0 * 60.0 * 60.0 * 1000.0).round() as i64)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: f64) -> String {
    if days <= 0.0 {
        "now".to_string()
    } else if days < 1.0 {
        let minutes = (days * MINUTES_PER_DAY).round().max(1.0) as i64;
        format!("{}m", minutes)
    } else if days < 7.0 {
        format!("{}d", days.round() as i64)
    } else if days < 30.0 {
        let weeks = (days / 7.0).floor() as i64;
        format!("{}w", weeks)
    } else if days < 365.0 {
        let months = (days / 30.0).floor() as i64;
        format!("{}mo", months)
    } else {
        let years = (days / 365.0).floor() as i64;
        format!("{}y", years)
    }
}
