//! Fractional sort-key assignment and chronological reconciliation.
//!
//! # Responsibility
//! - Compute sort keys that place an item at a display index without
//!   renumbering its siblings.
//! - Keep manual order consistent with time-of-day order for timed items.
//!
//! # Invariants
//! - Every function here is pure: no I/O, no mutation of the inputs.
//! - Ascending `sort_key` is display order; ties keep input order.
//! - Untimed items are never moved by time logic.

mod insertion;
mod reconcile;
mod time_key;

pub use insertion::{
    compute_insertion_key, has_adjacent_tie, sort_keys_for_len, DEFAULT_SORT_KEY,
    SORT_KEY_SPACING,
};
pub use reconcile::compute_reconciled_key;
pub use time_key::is_time_less_or_equal;

/// Identity/order-key capability shared by every user-orderable record.
///
/// Planner events and checklist entries both implement this; the ordering
/// functions never need to know which concrete record they are handling.
pub trait OrderableItem {
    /// Stable identifier, unique within one sibling list.
    type Id: PartialEq;

    /// Returns the stable identifier.
    fn item_id(&self) -> &Self::Id;

    /// Returns the current fractional sort key.
    fn sort_key(&self) -> f64;

    /// Returns the canonical time-of-day string, if the item is timed.
    ///
    /// All items of one list must use the same canonical format
    /// (zero-padded `HH:MM` or fixed-width UTC ISO 8601).
    fn occurs_at(&self) -> Option<&str>;
}

impl<T: OrderableItem + ?Sized> OrderableItem for &T {
    type Id = T::Id;

    fn item_id(&self) -> &Self::Id {
        (**self).item_id()
    }

    fn sort_key(&self) -> f64 {
        (**self).sort_key()
    }

    fn occurs_at(&self) -> Option<&str> {
        (**self).occurs_at()
    }
}

/// Returns references to `items` sorted ascending by sort key.
///
/// Uses a stable sort on `f64::total_cmp`, so equal keys keep their input
/// order and NaN keys sort last instead of panicking.
pub(crate) fn sorted_by_key<T: OrderableItem>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|left, right| left.sort_key().total_cmp(&right.sort_key()));
    sorted
}
