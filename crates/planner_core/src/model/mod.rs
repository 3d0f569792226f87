//! Planner domain model.
//!
//! # Responsibility
//! - Define the records persisted by core: day planners, planner events and
//!   checklist entries.
//! - Share identity, title, checked state and sort key through `ListItem`.
//!
//! # Invariants
//! - Every item is identified by a stable, non-nil `ListItemId`.
//! - Sort keys are finite; ascending key order is display order.
//! - Time values used for ordering are canonical UTC ISO strings.

pub mod checklist;
pub mod list_item;
pub mod planner;
pub mod planner_event;
pub mod validation;
