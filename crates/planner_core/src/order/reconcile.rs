//! Chronological reconciler.
//!
//! Restricted to timed items, ascending key order must match ascending time
//! order. The reconciler checks the target against its immediate timed
//! neighbors and only computes a new key when one of them disagrees.

use super::insertion::compute_insertion_key;
use super::time_key::is_time_less_or_equal;
use super::{sorted_by_key, OrderableItem};

/// Computes the sort key `target` should have among `all_siblings`.
///
/// `all_siblings` is the full list sharing the target's scope, in any order,
/// and should contain the target with its current key and time.
///
/// Returns the target's current key when it is untimed or already consistent
/// with its timed neighbors. Otherwise returns the gap-insertion key for the
/// slot right after the last remaining timed sibling whose time is earlier or
/// equal, or the front slot when no such sibling exists. No other item's key
/// is ever affected.
///
/// A target missing from `all_siblings` is treated as out of place and gets
/// a placement key.
pub fn compute_reconciled_key<T: OrderableItem>(target: &T, all_siblings: &[T]) -> f64 {
    let current_key = target.sort_key();
    let Some(target_time) = target.occurs_at() else {
        return current_key;
    };

    let sorted = sorted_by_key(all_siblings);
    let timed: Vec<&T> = sorted
        .iter()
        .copied()
        .filter(|item| item.occurs_at().is_some())
        .collect();

    if let Some(position) = timed
        .iter()
        .position(|item| item.item_id() == target.item_id())
    {
        let earlier_ok = position
            .checked_sub(1)
            .and_then(|index| timed[index].occurs_at())
            .map_or(true, |time| is_time_less_or_equal(time, target_time));
        let later_ok = timed
            .get(position + 1)
            .and_then(|item| item.occurs_at())
            .map_or(true, |time| is_time_less_or_equal(target_time, time));
        if earlier_ok && later_ok {
            return current_key;
        }
    }

    let remaining: Vec<&T> = sorted
        .into_iter()
        .filter(|item| item.item_id() != target.item_id())
        .collect();
    let anchor = remaining.iter().rposition(|item| {
        item.occurs_at()
            .is_some_and(|time| is_time_less_or_equal(time, target_time))
    });
    let target_index = anchor.map_or(0, |position| position + 1);

    compute_insertion_key(target_index, &remaining)
}

#[cfg(test)]
mod tests {
    use super::compute_reconciled_key;
    use crate::order::fixtures::{timed, untimed, Slot};

    fn with_key(slots: &[Slot], id: &str, key: f64) -> Vec<Slot> {
        slots
            .iter()
            .cloned()
            .map(|mut slot| {
                if slot.id == id {
                    slot.key = key;
                }
                slot
            })
            .collect()
    }

    fn find<'a>(slots: &'a [Slot], id: &str) -> &'a Slot {
        slots.iter().find(|slot| slot.id == id).unwrap()
    }

    #[test]
    fn out_of_order_item_moves_between_chronological_neighbors() {
        let slots = vec![
            timed("A", 8.0, "09:00"),
            timed("B", 16.0, "13:00"),
            timed("C", 24.0, "11:00"),
        ];

        let key = compute_reconciled_key(find(&slots, "C"), &slots);
        assert_eq!(key, 12.0);
        assert!(key > 8.0 && key < 16.0);
    }

    #[test]
    fn second_reconciliation_is_idempotent() {
        let slots = vec![
            timed("A", 8.0, "09:00"),
            timed("B", 16.0, "13:00"),
            timed("C", 24.0, "11:00"),
        ];
        let first = compute_reconciled_key(find(&slots, "C"), &slots);

        let updated = with_key(&slots, "C", first);
        let second = compute_reconciled_key(find(&updated, "C"), &updated);
        assert_eq!(second, 12.0);
        assert_eq!(first, second);
    }

    #[test]
    fn untimed_items_keep_their_key() {
        let slots = vec![untimed("a", 8.0), untimed("b", 16.0), untimed("c", 24.0)];
        for slot in &slots {
            assert_eq!(compute_reconciled_key(slot, &slots), slot.key);
        }
    }

    #[test]
    fn untimed_target_among_timed_items_keeps_its_key() {
        let slots = vec![
            timed("a", 8.0, "15:00"),
            untimed("b", 16.0),
            timed("c", 24.0, "07:00"),
        ];
        assert_eq!(compute_reconciled_key(find(&slots, "b"), &slots), 16.0);
    }

    #[test]
    fn consistent_timed_item_keeps_key_with_untimed_interleaved() {
        let slots = vec![
            timed("a", 8.0, "08:00"),
            untimed("b", 16.0),
            timed("c", 24.0, "10:00"),
            untimed("d", 32.0),
            timed("e", 40.0, "12:00"),
        ];
        assert_eq!(compute_reconciled_key(find(&slots, "c"), &slots), 24.0);
    }

    #[test]
    fn only_timed_item_keeps_key() {
        let slots = vec![untimed("a", 8.0), timed("b", 16.0, "23:00"), untimed("c", 24.0)];
        assert_eq!(compute_reconciled_key(find(&slots, "b"), &slots), 16.0);
    }

    #[test]
    fn equal_times_are_consistent() {
        let slots = vec![
            timed("a", 8.0, "10:00"),
            timed("b", 16.0, "10:00"),
            timed("c", 24.0, "10:00"),
        ];
        assert_eq!(compute_reconciled_key(find(&slots, "b"), &slots), 16.0);
    }

    #[test]
    fn earliest_item_moves_to_the_front() {
        let slots = vec![
            untimed("a", 8.0),
            timed("b", 16.0, "09:00"),
            timed("c", 24.0, "06:00"),
        ];
        assert_eq!(compute_reconciled_key(find(&slots, "c"), &slots), 4.0);
    }

    #[test]
    fn first_timed_item_later_than_its_successor_slides_down() {
        let slots = vec![
            timed("a", 8.0, "18:00"),
            timed("b", 16.0, "09:00"),
            untimed("c", 24.0),
        ];
        // Lands directly after "b", splitting the gap before the untimed item.
        assert_eq!(compute_reconciled_key(find(&slots, "a"), &slots), 20.0);
    }

    #[test]
    fn latest_item_dragged_to_the_top_appends_after_last_earlier_sibling() {
        let slots = vec![
            timed("z", 4.0, "22:00"),
            timed("a", 8.0, "09:00"),
            timed("b", 16.0, "13:00"),
        ];
        assert_eq!(compute_reconciled_key(find(&slots, "z"), &slots), 24.0);
    }

    #[test]
    fn sibling_order_in_input_does_not_matter() {
        let slots = vec![
            timed("C", 24.0, "11:00"),
            timed("B", 16.0, "13:00"),
            timed("A", 8.0, "09:00"),
        ];
        assert_eq!(compute_reconciled_key(find(&slots, "C"), &slots), 12.0);
    }

    #[test]
    fn reconciling_never_touches_other_items() {
        let slots = vec![
            timed("A", 8.0, "09:00"),
            timed("B", 16.0, "13:00"),
            timed("C", 24.0, "11:00"),
        ];
        let snapshot = slots.clone();
        let _ = compute_reconciled_key(find(&slots, "C"), &slots);
        assert_eq!(slots, snapshot);
    }

    #[test]
    fn target_missing_from_siblings_gets_a_placement_key() {
        let slots = vec![timed("A", 8.0, "09:00"), timed("B", 16.0, "13:00")];
        let stray = timed("X", 100.0, "10:00");
        assert_eq!(compute_reconciled_key(&stray, &slots), 12.0);

        let empty: Vec<Slot> = Vec::new();
        assert_eq!(compute_reconciled_key(&stray, &empty), 8.0);
    }

    #[test]
    fn tied_keys_do_not_panic() {
        let slots = vec![
            timed("a", 8.0, "12:00"),
            timed("b", 8.0, "09:00"),
            timed("c", f64::NAN, "10:00"),
        ];
        for slot in &slots {
            let _ = compute_reconciled_key(slot, &slots);
        }
    }

    #[test]
    fn reconciling_each_item_in_turn_converges() {
        let mut slots = vec![
            timed("a", 8.0, "17:00"),
            untimed("b", 16.0),
            timed("c", 24.0, "08:30"),
            timed("d", 32.0, "12:15"),
            untimed("e", 40.0),
            timed("f", 48.0, "06:45"),
        ];

        for _ in 0..slots.len() {
            for index in 0..slots.len() {
                let key = compute_reconciled_key(&slots[index], &slots);
                slots[index].key = key;
            }
        }

        for slot in &slots {
            assert_eq!(compute_reconciled_key(slot, &slots), slot.key, "{}", slot.id);
        }

        let mut timed_slots: Vec<&Slot> = slots.iter().filter(|slot| slot.time.is_some()).collect();
        timed_slots.sort_by(|left, right| left.key.total_cmp(&right.key));
        let times: Vec<&str> = timed_slots.iter().filter_map(|slot| slot.time).collect();
        assert_eq!(times, vec!["06:45", "08:30", "12:15", "17:00"]);
    }
}
