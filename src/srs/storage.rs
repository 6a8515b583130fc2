//! Storage for scheduling state
//!
//! Directory structure under the data directory:
//! ```text
//! srs/
//! ├── states/
//! │   └── {card-id}.json   # One scheduling record per card
//! └── counters.json        # Aggregate review counters
//! ```
//!
//! Writes go through a temp-file-then-rename step so a record is never
//! observable half-written. Each record carries a revision number; `save`
//! refuses to overwrite a record whose stored revision differs from the
//! caller's copy, which turns a concurrent read-modify-write race into a
//! `Conflict` the caller can retry.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::INITIAL_EASE_FACTOR;
use super::models::{Phase, SchedulingState, SrsStats};

/// Interval at which a card counts as mature, in days
pub const MATURE_INTERVAL_DAYS: f64 = 21.0;

#[derive(Error, Debug)]
pub enum SrsStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scheduling state not found for card {0}")]
    StateNotFound(Uuid),

    #[error("Conflicting write for card {card_id}: expected revision {expected}, found {found}")]
    Conflict {
        card_id: Uuid,
        expected: u64,
        found: u64,
    },
}

pub type Result<T> = std::result::Result<T, SrsStorageError>;

/// Running totals across every review ever submitted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCounters {
    #[serde(default)]
    pub total_reviews: u64,
    #[serde(default)]
    pub correct_answers: u64,
    pub last_updated: DateTime<Utc>,
}

/// Storage manager for per-card scheduling records
pub struct SrsStorage {
    base_path: PathBuf,
}

impl SrsStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn srs_dir(&self) -> PathBuf {
        self.base_path.join("srs")
    }

    fn states_dir(&self) -> PathBuf {
        self.srs_dir().join("states")
    }

    fn state_path(&self, card_id: Uuid) -> PathBuf {
        self.states_dir().join(format!("{}.json", card_id))
    }

    fn counters_path(&self) -> PathBuf {
        self.srs_dir().join("counters.json")
    }

    /// Create the storage directories if they do not exist yet
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.states_dir())?;
        Ok(())
    }

    /// Load the scheduling state for a card
    pub fn load(&self, card_id: Uuid) -> Result<SchedulingState> {
        let path = self.state_path(card_id);
        if !path.exists() {
            return Err(SrsStorageError::StateNotFound(card_id));
        }

        let content = fs::read_to_string(&path)?;
        let state: SchedulingState = serde_json::from_str(&content)?;
        Ok(state)
    }

    /// Load the scheduling state for a card, creating and persisting a
    /// fresh New record when none exists yet.
    pub fn ensure(&self, card_id: Uuid, now: DateTime<Utc>) -> Result<SchedulingState> {
        match self.load(card_id) {
            Ok(state) => Ok(state),
            Err(SrsStorageError::StateNotFound(_)) => {
                log::debug!("Initializing scheduling state for card {}", card_id);
                self.save(&SchedulingState::new(card_id, now))
            }
            Err(err) => Err(err),
        }
    }

    /// Persist a scheduling state.
    ///
    /// Fails with `Conflict` when the stored revision no longer matches the
    /// caller's copy; the caller must re-read and retry if it wants to. On
    /// success the returned state carries the bumped revision.
    pub fn save(&self, state: &SchedulingState) -> Result<SchedulingState> {
        self.init()?;
        let path = self.state_path(state.card_id);

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let stored: SchedulingState = serde_json::from_str(&content)?;
            if stored.revision != state.revision {
                return Err(SrsStorageError::Conflict {
                    card_id: state.card_id,
                    expected: state.revision,
                    found: stored.revision,
                });
            }
        }

        let mut next = state.clone();
        next.revision = state.revision + 1;
        write_json(&path, &next)?;
        Ok(next)
    }

    /// All scheduling records, in no particular order
    pub fn list_all(&self) -> Result<Vec<SchedulingState>> {
        let states_dir = self.states_dir();
        if !states_dir.exists() {
            return Ok(Vec::new());
        }

        let mut states = Vec::new();
        for entry in fs::read_dir(&states_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                let state: SchedulingState = serde_json::from_str(&content)?;
                states.push(state);
            }
        }

        Ok(states)
    }

    /// Remove the scheduling record for a card.
    ///
    /// Only the content layer calls this, when the owning flashcard is
    /// deleted. Missing records are not an error.
    pub fn delete(&self, card_id: Uuid) -> Result<()> {
        let path = self.state_path(card_id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Current aggregate counters
    pub fn counters(&self) -> Result<ReviewCounters> {
        let path = self.counters_path();
        if !path.exists() {
            return Ok(ReviewCounters {
                total_reviews: 0,
                correct_answers: 0,
                last_updated: DateTime::<Utc>::MIN_UTC,
            });
        }

        let content = fs::read_to_string(&path)?;
        let counters: ReviewCounters = serde_json::from_str(&content)?;
        Ok(counters)
    }

    /// Fold one submitted review into the aggregate counters
    pub fn record_review(&self, correct: bool, now: DateTime<Utc>) -> Result<()> {
        self.init()?;
        let mut counters = self.counters()?;
        counters.total_reviews += 1;
        if correct {
            counters.correct_answers += 1;
        }
        counters.last_updated = now;
        write_json(&self.counters_path(), &counters)
    }

    /// Assemble statistics over every scheduling record
    pub fn stats(&self, now: DateTime<Utc>) -> Result<SrsStats> {
        let states = self.list_all()?;
        let counters = self.counters()?;

        let mut stats = SrsStats {
            total_cards: states.len(),
            total_reviews: counters.total_reviews,
            correct_answers: counters.correct_answers,
            ..SrsStats::default()
        };

        if counters.total_reviews > 0 {
            stats.accuracy =
                counters.correct_answers as f64 / counters.total_reviews as f64 * 100.0;
        }

        let mut ease_sum = 0.0f32;
        for state in &states {
            match state.phase {
                Phase::New => stats.new_cards += 1,
                Phase::Learning => stats.learning_cards += 1,
                Phase::Review => stats.review_cards += 1,
                Phase::Relearning => stats.relearning_cards += 1,
            }
            if state.is_due(now) {
                stats.due_cards += 1;
            }
            if state.repetitions > 0 {
                stats.cards_learned += 1;
            }
            if state.interval_days >= MATURE_INTERVAL_DAYS {
                stats.cards_mature += 1;
            }
            ease_sum += state.ease_factor;
        }

        stats.average_ease = if states.is_empty() {
            INITIAL_EASE_FACTOR
        } else {
            ease_sum / states.len() as f32
        };

        Ok(stats)
    }
}

/// Serialize to a temp file next to `path`, then rename over it
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, serde_json::to_string_pretty(value)?)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::algorithm::next_state;
    use crate::srs::models::Grade;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
    }

    fn create_test_storage() -> (SrsStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = SrsStorage::new(temp_dir.path().to_path_buf());
        storage.init().unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn load_missing_state_is_not_found() {
        let (storage, _temp) = create_test_storage();
        let card_id = Uuid::new_v4();

        match storage.load(card_id) {
            Err(SrsStorageError::StateNotFound(id)) => assert_eq!(id, card_id),
            other => panic!("expected StateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn ensure_initializes_a_new_record() {
        let (storage, _temp) = create_test_storage();
        let card_id = Uuid::new_v4();

        let state = storage.ensure(card_id, fixed_now()).unwrap();
        assert_eq!(state.phase, Phase::New);
        assert_eq!(state.interval_days, 0.0);
        assert_eq!(state.ease_factor, INITIAL_EASE_FACTOR);
        assert_eq!(state.revision, 1);

        // Second call loads the persisted record instead of reinitializing
        let again = storage.ensure(card_id, fixed_now()).unwrap();
        assert_eq!(again.revision, 1);
        assert_eq!(again.created_at, state.created_at);
    }

    #[test]
    fn save_bumps_revision() {
        let (storage, _temp) = create_test_storage();
        let state = storage.ensure(Uuid::new_v4(), fixed_now()).unwrap();

        let reviewed = next_state(&state, Grade::Good, fixed_now());
        let saved = storage.save(&reviewed).unwrap();
        assert_eq!(saved.revision, state.revision + 1);

        let loaded = storage.load(state.card_id).unwrap();
        assert_eq!(loaded.revision, saved.revision);
        assert_eq!(loaded.phase, Phase::Learning);
    }

    #[test]
    fn stale_save_is_a_conflict() {
        let (storage, _temp) = create_test_storage();
        let state = storage.ensure(Uuid::new_v4(), fixed_now()).unwrap();

        // Two readers pick up the same record; the first write wins
        let first = next_state(&state, Grade::Good, fixed_now());
        let second = next_state(&state, Grade::Again, fixed_now());
        storage.save(&first).unwrap();

        match storage.save(&second) {
            Err(SrsStorageError::Conflict {
                card_id,
                expected,
                found,
            }) => {
                assert_eq!(card_id, state.card_id);
                assert_eq!(expected, state.revision);
                assert_eq!(found, state.revision + 1);
            }
            other => panic!("expected Conflict, got {:?}", other),
        }

        // The losing write left no trace
        let loaded = storage.load(state.card_id).unwrap();
        assert_eq!(loaded.phase, Phase::Learning);
    }

    #[test]
    fn delete_removes_the_record() {
        let (storage, _temp) = create_test_storage();
        let state = storage.ensure(Uuid::new_v4(), fixed_now()).unwrap();

        storage.delete(state.card_id).unwrap();
        assert!(matches!(
            storage.load(state.card_id),
            Err(SrsStorageError::StateNotFound(_))
        ));

        // Deleting an absent record is fine
        storage.delete(state.card_id).unwrap();
    }

    #[test]
    fn list_all_returns_every_record() {
        let (storage, _temp) = create_test_storage();
        for _ in 0..5 {
            storage.ensure(Uuid::new_v4(), fixed_now()).unwrap();
        }

        let states = storage.list_all().unwrap();
        assert_eq!(states.len(), 5);
    }

    #[test]
    fn counters_accumulate() {
        let (storage, _temp) = create_test_storage();

        storage.record_review(true, fixed_now()).unwrap();
        storage.record_review(false, fixed_now()).unwrap();
        storage.record_review(true, fixed_now()).unwrap();

        let counters = storage.counters().unwrap();
        assert_eq!(counters.total_reviews, 3);
        assert_eq!(counters.correct_answers, 2);
    }

    #[test]
    fn stats_derivation() {
        let (storage, _temp) = create_test_storage();
        let now = fixed_now();

        // One New card
        storage.ensure(Uuid::new_v4(), now).unwrap();

        // One learned Review card, mature and overdue
        let mut mature = SchedulingState::new(Uuid::new_v4(), now);
        mature.phase = Phase::Review;
        mature.interval_days = 30.0;
        mature.repetitions = 5;
        mature.due_at = now - chrono::Duration::hours(2);
        storage.save(&mature).unwrap();

        // One young Review card, not yet due
        let mut young = SchedulingState::new(Uuid::new_v4(), now);
        young.phase = Phase::Review;
        young.interval_days = 2.0;
        young.repetitions = 1;
        young.due_at = now + chrono::Duration::days(1);
        storage.save(&young).unwrap();

        storage.record_review(true, now).unwrap();
        storage.record_review(false, now).unwrap();

        let stats = storage.stats(now).unwrap();
        assert_eq!(stats.total_cards, 3);
        assert_eq!(stats.new_cards, 1);
        assert_eq!(stats.review_cards, 2);
        assert_eq!(stats.due_cards, 2); // the New card and the overdue one
        assert_eq!(stats.cards_learned, 2);
        assert_eq!(stats.cards_mature, 1);
        assert_eq!(stats.total_reviews, 2);
        assert!((stats.accuracy - 50.0).abs() < 1e-9);
    }
}
