//! Storage operations for flashcard content
//!
//! Directory structure under the data directory:
//! ```text
//! cards/
//! └── {card-id}.json   # Individual card files
//! ```

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use super::models::Flashcard;

#[derive(Error, Debug)]
pub enum CardStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, CardStorageError>;

/// Storage manager for flashcard content
pub struct CardStorage {
    base_path: PathBuf,
}

impl CardStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn cards_dir(&self) -> PathBuf {
        self.base_path.join("cards")
    }

    fn card_path(&self, card_id: Uuid) -> PathBuf {
        self.cards_dir().join(format!("{}.json", card_id))
    }

    /// Create the cards directory if it does not exist yet
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.cards_dir())?;
        Ok(())
    }

    /// Persist a new card
    pub fn create(&self, card: &Flashcard) -> Result<()> {
        self.init()?;
        let path = self.card_path(card.id);
        fs::write(&path, serde_json::to_string_pretty(card)?)?;
        Ok(())
    }

    /// Get a specific card
    pub fn get(&self, card_id: Uuid) -> Result<Flashcard> {
        let path = self.card_path(card_id);
        if !path.exists() {
            return Err(CardStorageError::CardNotFound(card_id));
        }

        let content = fs::read_to_string(&path)?;
        let card: Flashcard = serde_json::from_str(&content)?;
        Ok(card)
    }

    /// Whether content still exists for this card id.
    ///
    /// Queue entries are validated against this before being shown, since
    /// a card can be deleted between selection and display.
    pub fn exists(&self, card_id: Uuid) -> bool {
        self.card_path(card_id).exists()
    }

    /// List all cards, oldest first
    pub fn list_all(&self) -> Result<Vec<Flashcard>> {
        let cards_dir = self.cards_dir();
        if !cards_dir.exists() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        for entry in fs::read_dir(&cards_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                let card: Flashcard = serde_json::from_str(&content)?;
                cards.push(card);
            }
        }

        cards.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(cards)
    }

    /// Delete a card
    pub fn delete(&self, card_id: Uuid) -> Result<()> {
        let path = self.card_path(card_id);
        if !path.exists() {
            return Err(CardStorageError::CardNotFound(card_id));
        }
        fs::remove_file(&path)?;
        Ok(())
    }
}
