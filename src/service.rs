//! Study service: the composition layer over content and scheduling
//!
//! Owns one `CardStorage` and one `SrsStorage` and wires them together the
//! way a review session needs: due batches validated against existing
//! content, review submission through the scheduling algorithm, previews,
//! and the create/delete cascade between a card and its scheduling record.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cards::{storage::CardStorageError, CardStorage, Flashcard};
use crate::srs::{
    algorithm::{self, format_interval},
    queue::{self, NewCardOrder},
    Grade, SchedulingState, SrsError, SrsStats, SrsStorage, SrsStorageError,
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Srs(#[from] SrsError),

    #[error(transparent)]
    SrsStorage(#[from] SrsStorageError),

    #[error(transparent)]
    CardStorage(#[from] CardStorageError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// A due card paired with its scheduling record, ready for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCard {
    pub card: Flashcard,
    pub state: SchedulingState,
}

/// Predicted outcome of each grade for one card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPreview {
    pub card_id: Uuid,
    /// Predicted intervals in days, in rating order Again..Easy
    pub interval_days: [f64; 4],
    /// The same intervals, human readable ("10m", "4d", ...)
    pub formatted: [String; 4],
}

pub struct StudyService {
    cards: CardStorage,
    srs: SrsStorage,
    new_card_order: NewCardOrder,
}

impl StudyService {
    pub fn new(data_dir: PathBuf, new_card_order: NewCardOrder) -> Result<Self> {
        let cards = CardStorage::new(data_dir.clone());
        let srs = SrsStorage::new(data_dir);
        cards.init()?;
        srs.init()?;
        Ok(Self {
            cards,
            srs,
            new_card_order,
        })
    }

    /// Create a flashcard together with its New scheduling record
    pub fn create_card(
        &self,
        front: String,
        back: String,
        reading: Option<String>,
        notes: Option<String>,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Flashcard> {
        let mut card = Flashcard::new(front, back, now);
        card.reading = reading;
        card.notes = notes;
        card.tags = tags;

        self.cards.create(&card)?;
        self.srs.ensure(card.id, now)?;
        log::info!("Created flashcard {} ({})", card.id, card.front);
        Ok(card)
    }

    pub fn get_card(&self, card_id: Uuid) -> Result<Flashcard> {
        Ok(self.cards.get(card_id)?)
    }

    pub fn list_cards(&self) -> Result<Vec<Flashcard>> {
        Ok(self.cards.list_all()?)
    }

    /// Delete a card and cascade to its scheduling record
    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        self.cards.delete(card_id)?;
        self.srs.delete(card_id)?;
        log::info!("Deleted flashcard {}", card_id);
        Ok(())
    }

    /// Scheduling record for one card
    pub fn state(&self, card_id: Uuid) -> Result<SchedulingState> {
        Ok(self.srs.load(card_id)?)
    }

    /// The next batch of due cards, in queue order.
    ///
    /// Ids whose content has disappeared since selection are skipped and
    /// the queue is drained further, so the batch stays full as long as
    /// enough due cards remain.
    pub fn due_batch(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<DueCard>> {
        let states = self.srs.list_all()?;
        let ordered = queue::select_due(&states, now, usize::MAX, self.new_card_order);

        let mut batch = Vec::new();
        for card_id in ordered {
            if batch.len() >= limit {
                break;
            }
            match self.cards.get(card_id) {
                Ok(card) => {
                    let state = self.srs.load(card_id)?;
                    batch.push(DueCard { card, state });
                }
                Err(CardStorageError::CardNotFound(_)) => {
                    log::warn!("Skipping due card {} with no content", card_id);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(batch)
    }

    /// Submit a review and persist the rescheduled state.
    ///
    /// A card without a scheduling record gets a fresh one first, so a
    /// review never fails on NotFound. A rating outside 1-4 is rejected.
    pub fn submit_review(
        &self,
        card_id: Uuid,
        rating: i32,
        now: DateTime<Utc>,
    ) -> Result<SchedulingState> {
        let grade = Grade::from_rating(rating)?;
        let state = self.srs.ensure(card_id, now)?;
        let next = algorithm::next_state(&state, grade, now);
        let saved = self.srs.save(&next)?;
        self.srs.record_review(grade.is_correct(), now)?;
        log::debug!(
            "Reviewed card {} as {:?}: {:?} -> {:?}, next in {}",
            card_id,
            grade,
            state.phase,
            saved.phase,
            format_interval(saved.interval_days)
        );
        Ok(saved)
    }

    /// Predicted intervals for all four grades, with no observable state
    /// change: a card without a record is previewed against an unsaved New
    /// state.
    pub fn preview(&self, card_id: Uuid, now: DateTime<Utc>) -> Result<ReviewPreview> {
        let state = match self.srs.load(card_id) {
            Ok(state) => state,
            Err(SrsStorageError::StateNotFound(_)) => SchedulingState::new(card_id, now),
            Err(err) => return Err(err.into()),
        };

        let interval_days = algorithm::preview_intervals(&state);
        let formatted = interval_days.map(format_interval);
        Ok(ReviewPreview {
            card_id,
            interval_days,
            formatted,
        })
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<SrsStats> {
        Ok(self.srs.stats(now)?)
    }
}
