//! Data models for flashcard content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vocabulary flashcard captured while reading.
///
/// Content only; scheduling lives in its own record keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    /// The expression as it appeared on the page
    pub front: String,
    /// Meaning or translation
    pub back: String,
    /// Kana reading, when the front contains kanji
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flashcard {
    pub fn new(front: String, back: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            front,
            back,
            reading: None,
            notes: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
