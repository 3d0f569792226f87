//! Gap-insertion indexer.

use super::OrderableItem;

/// Key assigned to the first item of an empty list.
pub const DEFAULT_SORT_KEY: f64 = 8.0;

/// Gap left after the last item when appending.
pub const SORT_KEY_SPACING: f64 = 8.0;

/// Computes a sort key that places an item at `target_index`.
///
/// `siblings` must be sorted ascending by key and must not contain the item
/// being placed. Indexes past the end append.
///
/// - empty list: [`DEFAULT_SORT_KEY`]
/// - index 0: half of the current smallest key
/// - index >= len: last key plus [`SORT_KEY_SPACING`]
/// - otherwise: midpoint of the surrounding gap
///
/// When repeated insertions exhaust `f64` precision the midpoint can equal a
/// neighbor; the resulting tie is accepted and sorts stably.
pub fn compute_insertion_key<T: OrderableItem>(target_index: usize, siblings: &[T]) -> f64 {
    let (Some(first), Some(last)) = (siblings.first(), siblings.last()) else {
        return DEFAULT_SORT_KEY;
    };

    if target_index == 0 {
        return first.sort_key() / 2.0;
    }
    if target_index >= siblings.len() {
        return last.sort_key() + SORT_KEY_SPACING;
    }

    let before = siblings[target_index - 1].sort_key();
    let after = siblings[target_index].sort_key();
    before + (after - before) / 2.0
}

/// Returns evenly spaced keys `8, 16, 24, ...` for `len` items.
pub fn sort_keys_for_len(len: usize) -> Vec<f64> {
    (1..=len)
        .map(|position| position as f64 * SORT_KEY_SPACING)
        .collect()
}

/// Returns whether two neighbors in key order share the same key.
///
/// A tie means the gap between them can no longer be split.
pub fn has_adjacent_tie<T: OrderableItem>(siblings: &[T]) -> bool {
    let sorted = super::sorted_by_key(siblings);
    sorted
        .windows(2)
        .any(|pair| pair[0].sort_key() == pair[1].sort_key())
}

#[cfg(test)]
mod tests {
    use super::{compute_insertion_key, has_adjacent_tie, sort_keys_for_len, DEFAULT_SORT_KEY};
    use crate::order::fixtures::{untimed, Slot};

    fn three() -> Vec<Slot> {
        vec![untimed("a", 8.0), untimed("b", 16.0), untimed("c", 24.0)]
    }

    #[test]
    fn empty_list_uses_default_key() {
        let empty: Vec<Slot> = Vec::new();
        assert_eq!(compute_insertion_key(0, &empty), DEFAULT_SORT_KEY);
        assert_eq!(compute_insertion_key(5, &empty), 8.0);
    }

    #[test]
    fn front_and_back_boundaries() {
        let single = vec![untimed("a", 8.0)];
        assert_eq!(compute_insertion_key(0, &single), 4.0);
        assert_eq!(compute_insertion_key(1, &single), 16.0);
    }

    #[test]
    fn index_past_end_appends() {
        assert_eq!(compute_insertion_key(3, &three()), 32.0);
        assert_eq!(compute_insertion_key(99, &three()), 32.0);
    }

    #[test]
    fn untimed_insertion_in_the_middle_takes_the_midpoint() {
        assert_eq!(compute_insertion_key(2, &three()), 20.0);
        assert_eq!(compute_insertion_key(1, &three()), 12.0);
    }

    #[test]
    fn inner_keys_fall_strictly_between_neighbors() {
        let siblings = vec![
            untimed("a", 0.5),
            untimed("b", 3.0),
            untimed("c", 3.25),
            untimed("d", 100.0),
        ];
        for index in 1..siblings.len() {
            let key = compute_insertion_key(index, &siblings);
            assert!(key > siblings[index - 1].key, "index {index} key {key}");
            assert!(key < siblings[index].key, "index {index} key {key}");
        }
    }

    #[test]
    fn exhausted_gap_yields_tie_without_panicking() {
        let low = 1.0_f64;
        let high = f64::from_bits(low.to_bits() + 1);
        let siblings = vec![untimed("a", low), untimed("b", high)];

        let key = compute_insertion_key(1, &siblings);
        assert!(key == low || key == high);

        let mut with_new = siblings.clone();
        with_new.push(untimed("new", key));
        assert!(has_adjacent_tie(&with_new));
    }

    #[test]
    fn distinct_keys_have_no_tie() {
        assert!(!has_adjacent_tie(&three()));
    }

    #[test]
    fn spaced_keys_follow_spacing_unit() {
        assert_eq!(sort_keys_for_len(0), Vec::<f64>::new());
        assert_eq!(sort_keys_for_len(3), vec![8.0, 16.0, 24.0]);
    }
}
