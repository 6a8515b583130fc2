//! Flashcard content for Kioku
//!
//! Thin CRUD over vocabulary cards captured while reading. Scheduling is
//! deliberately elsewhere: the `srs` module owns when a card comes back.

pub mod models;
pub mod storage;

pub use models::Flashcard;
pub use storage::{CardStorage, CardStorageError};
