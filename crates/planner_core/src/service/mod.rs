//! Core use-case services.
//!
//! # Responsibility
//! - Turn user gestures (create, drag, retitle, check, delete) into sort-key
//!   computations and repository writes.
//! - Keep UI/FFI layers decoupled from storage and ordering details.

use crate::order::{has_adjacent_tie, OrderableItem};
use log::warn;
use std::fmt::Display;

pub mod checklist_service;
pub mod planner_service;

/// Whether `sort_key` or the existing keys of one sibling list have stopped
/// being distinct.
pub(crate) fn gap_exhausted<T: OrderableItem>(siblings: &[T], sort_key: f64) -> bool {
    siblings.iter().any(|sibling| sibling.sort_key() == sort_key) || has_adjacent_tie(siblings)
}

/// Logs a tie in one sibling list; `scope` names the list (`day:...`,
/// `parent:...`), never user text.
pub(crate) fn warn_on_exhausted_gap<T: OrderableItem>(
    siblings: &[T],
    sort_key: f64,
    scope: impl Display,
) {
    if gap_exhausted(siblings, sort_key) {
        warn!(
            "event=sort_key_tie module=service status=degraded scope={} sort_key={}",
            scope, sort_key
        );
    }
}
