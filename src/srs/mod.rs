//! Spaced repetition system for Kioku
//!
//! This module provides:
//! - The pure scheduling algorithm (grade -> next state, preview)
//! - Deterministic due-card queue selection
//! - Scheduling state persistence with optimistic revision checks
//! - Aggregate review statistics

pub mod algorithm;
pub mod models;
pub mod queue;
pub mod storage;

pub use models::{Grade, Phase, SchedulingState, SrsError, SrsStats};
pub use queue::NewCardOrder;
pub use storage::{SrsStorage, SrsStorageError};
