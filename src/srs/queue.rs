//! Review queue selection
//!
//! Decides which cards are eligible for review at a given instant and in
//! what order they are presented. Selection is a pure function of its
//! inputs: no mutation, no I/O, and repeated calls over unchanged state
//! return an identical sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{Phase, SchedulingState};

/// Where never-reviewed cards sort relative to dated due cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NewCardOrder {
    /// New cards ahead of every dated card, as though due at -infinity
    #[default]
    First,
    /// Dated reviews first, New cards appended after them
    Last,
}

/// Select at most `limit` due card ids, deterministically ordered.
///
/// A card is eligible iff it is New (always due) or its `due_at` has
/// passed. Dated cards sort by `due_at` ascending; New cards sort among
/// themselves in creation order and are placed before or after the dated
/// ones per `new_card_order`. Ties fall back to creation instant and then
/// card id, so the order is total.
pub fn select_due<'a, I>(
    states: I,
    now: DateTime<Utc>,
    limit: usize,
    new_card_order: NewCardOrder,
) -> Vec<Uuid>
where
    I: IntoIterator<Item = &'a SchedulingState>,
{
    let mut eligible: Vec<&SchedulingState> =
        states.into_iter().filter(|s| s.is_due(now)).collect();

    eligible.sort_by_key(|s| sort_key(s, new_card_order));
    eligible
        .into_iter()
        .take(limit)
        .map(|s| s.card_id)
        .collect()
}

fn sort_key(
    state: &SchedulingState,
    order: NewCardOrder,
) -> (u8, DateTime<Utc>, DateTime<Utc>, Uuid) {
    let is_new = state.phase == Phase::New;
    let bucket = match (is_new, order) {
        (true, NewCardOrder::First) => 0,
        (false, _) => 1,
        (true, NewCardOrder::Last) => 2,
    };
    // New cards have no meaningful due_at; order them by creation instead
    let primary = if is_new { state.created_at } else { state.due_at };
    (bucket, primary, state.created_at, state.card_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
    }

    fn dated_state(card_id: Uuid, due_offset: Duration, created_offset: Duration) -> SchedulingState {
        let now = fixed_now();
        let mut state = SchedulingState::new(card_id, now + created_offset);
        state.phase = Phase::Review;
        state.interval_days = 1.0;
        state.due_at = now + due_offset;
        state.last_reviewed_at = Some(now - Duration::days(1));
        state
    }

    fn new_state(card_id: Uuid, created_offset: Duration) -> SchedulingState {
        SchedulingState::new(card_id, fixed_now() + created_offset)
    }

    #[test]
    fn filters_out_future_cards_and_respects_limit() {
        let new_id = Uuid::new_v4();
        let overdue_id = Uuid::new_v4();
        let future_id = Uuid::new_v4();

        let states = vec![
            dated_state(future_id, Duration::hours(1), Duration::days(-3)),
            new_state(new_id, Duration::zero()),
            dated_state(overdue_id, Duration::hours(-1), Duration::days(-2)),
        ];

        let selected = select_due(&states, fixed_now(), 2, NewCardOrder::First);
        assert_eq!(selected, vec![new_id, overdue_id]);

        let selected = select_due(&states, fixed_now(), 2, NewCardOrder::Last);
        assert_eq!(selected, vec![overdue_id, new_id]);
    }

    #[test]
    fn dated_cards_sort_by_due_at_ascending() {
        let a = dated_state(Uuid::new_v4(), Duration::hours(-1), Duration::days(-1));
        let b = dated_state(Uuid::new_v4(), Duration::hours(-3), Duration::days(-1));
        let c = dated_state(Uuid::new_v4(), Duration::hours(-2), Duration::days(-1));

        let states = vec![a.clone(), b.clone(), c.clone()];
        let selected = select_due(&states, fixed_now(), 10, NewCardOrder::First);

        assert_eq!(selected, vec![b.card_id, c.card_id, a.card_id]);
    }

    #[test]
    fn equally_due_cards_keep_creation_order() {
        let older = dated_state(Uuid::new_v4(), Duration::hours(-1), Duration::days(-5));
        let newer = dated_state(Uuid::new_v4(), Duration::hours(-1), Duration::days(-1));

        // Insertion order must not matter
        let selected = select_due(
            vec![&newer, &older],
            fixed_now(),
            10,
            NewCardOrder::First,
        );
        assert_eq!(selected, vec![older.card_id, newer.card_id]);
    }

    #[test]
    fn new_cards_surface_in_creation_order() {
        let first = new_state(Uuid::new_v4(), Duration::minutes(-30));
        let second = new_state(Uuid::new_v4(), Duration::minutes(-10));

        let selected = select_due(
            vec![&second, &first],
            fixed_now(),
            10,
            NewCardOrder::First,
        );
        assert_eq!(selected, vec![first.card_id, second.card_id]);
    }

    #[test]
    fn repeated_calls_return_identical_sequences() {
        let states: Vec<SchedulingState> = (0..20)
            .map(|i| {
                if i % 3 == 0 {
                    new_state(Uuid::new_v4(), Duration::minutes(-i))
                } else {
                    dated_state(Uuid::new_v4(), Duration::minutes(-i), Duration::hours(-i))
                }
            })
            .collect();

        let a = select_due(&states, fixed_now(), 10, NewCardOrder::First);
        let b = select_due(&states, fixed_now(), 10, NewCardOrder::First);
        assert_eq!(a, b);
    }

    #[test]
    fn card_due_exactly_now_is_eligible() {
        let state = dated_state(Uuid::new_v4(), Duration::zero(), Duration::days(-1));
        let selected = select_due(vec![&state], fixed_now(), 10, NewCardOrder::First);
        assert_eq!(selected, vec![state.card_id]);
    }
}
