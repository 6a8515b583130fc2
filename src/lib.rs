//! Kioku — vocabulary flashcard and spaced repetition backend for a manga
//! reader.
//!
//! The manga library, file import, and reading UI live elsewhere; this
//! crate owns the flashcards a reader captures and the schedule that
//! brings each one back at the right moment:
//!
//! - [`srs`] — the scheduling engine: pure review algorithm, deterministic
//!   due-queue selection, and per-card state persistence
//! - [`cards`] — flashcard content CRUD
//! - [`service`] — the composition layer a review session drives
//! - [`server`] — HTTP surface for the reader frontend
//! - [`config`] — TOML configuration

pub mod cards;
pub mod config;
pub mod server;
pub mod service;
pub mod srs;

pub use config::Config;
pub use service::StudyService;
