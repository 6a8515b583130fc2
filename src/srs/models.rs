//! Data models for the spaced repetition system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::INITIAL_EASE_FACTOR;

#[derive(Error, Debug)]
pub enum SrsError {
    #[error("Invalid review rating {0}, expected 1 (Again) to 4 (Easy)")]
    InvalidRating(i32),
}

/// The four-level self-assessment a user gives after seeing a card's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grade {
    /// Failed recall
    Again,
    /// Recalled with serious difficulty
    Hard,
    /// Recalled correctly
    Good,
    /// Recalled effortlessly
    Easy,
}

impl Grade {
    /// Parse the UI rating scale (1=Again, 2=Hard, 3=Good, 4=Easy).
    ///
    /// Anything outside 1-4 is rejected rather than coerced.
    pub fn from_rating(rating: i32) -> Result<Self, SrsError> {
        match rating {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            other => Err(SrsError::InvalidRating(other)),
        }
    }

    pub fn rating(&self) -> i32 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Whether the answer counts as a successful recall
    pub fn is_correct(&self) -> bool {
        !matches!(self, Self::Again)
    }

    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];
}

/// Coarse scheduling phase of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Never reviewed
    New,
    /// In initial learning steps
    Learning,
    /// Graduated to spaced review
    Review,
    /// Failed out of Review and re-learning
    Relearning,
}

impl Default for Phase {
    fn default() -> Self {
        Self::New
    }
}

/// Per-card scheduling record, the unit the scheduler operates on.
///
/// Mutated exclusively by the review operation; created when the owning
/// flashcard is created and deleted only when that flashcard is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingState {
    pub card_id: Uuid,
    #[serde(default)]
    pub phase: Phase,
    /// Current interval in days; fractional while in sub-day learning steps
    #[serde(default)]
    pub interval_days: f64,
    /// Multiplier controlling interval growth in Review (floor 1.3)
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f32,
    /// Consecutive successful reviews since the last lapse
    #[serde(default)]
    pub repetitions: u32,
    /// Times the card fell out of Review; only ever increments
    #[serde(default)]
    pub lapses: u32,
    /// When the card next becomes eligible for review
    pub due_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Creation instant, also the stable tie-break key for queue ordering
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency token owned by the persistence layer
    #[serde(default)]
    pub revision: u64,
}

fn default_ease_factor() -> f32 {
    INITIAL_EASE_FACTOR
}

impl SchedulingState {
    pub fn new(card_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            card_id,
            phase: Phase::New,
            interval_days: 0.0,
            ease_factor: INITIAL_EASE_FACTOR,
            repetitions: 0,
            lapses: 0,
            // New cards are immediately eligible
            due_at: now,
            last_reviewed_at: None,
            created_at: now,
            revision: 0,
        }
    }

    /// Check whether the card is eligible for review at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.phase == Phase::New || self.due_at <= now
    }
}

/// Aggregate statistics across all scheduling states
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub relearning_cards: usize,
    pub due_cards: usize,
    pub total_reviews: u64,
    pub correct_answers: u64,
    /// Percentage of reviews answered correctly
    pub accuracy: f64,
    /// Cards with at least one successful review
    pub cards_learned: usize,
    /// Cards with an interval of 21 days or more
    pub cards_mature: usize,
    pub average_ease: f32,
}

impl Default for SrsStats {
    fn default() -> Self {
        Self {
            total_cards: 0,
            new_cards: 0,
            learning_cards: 0,
            review_cards: 0,
            relearning_cards: 0,
            due_cards: 0,
            total_reviews: 0,
            correct_answers: 0,
            accuracy: 0.0,
            cards_learned: 0,
            cards_mature: 0,
            average_ease: INITIAL_EASE_FACTOR,
        }
    }
}
