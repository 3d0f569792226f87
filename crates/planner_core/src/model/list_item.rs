//! Fields shared by every user-orderable list entry.

use super::validation::{ensure_finite_sort_key, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for planner events and checklist entries.
pub type ListItemId = Uuid;

/// Identity, title, checked state and position of one list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Stable id, never reused.
    pub id: ListItemId,
    /// User-facing text.
    pub title: String,
    /// Completed/checked marker.
    pub is_checked: bool,
    /// Fractional position among siblings.
    pub sort_key: f64,
}

impl ListItem {
    /// Creates an unchecked, untitled item with a generated id.
    pub fn new(sort_key: f64) -> Self {
        Self::with_id(Uuid::new_v4(), sort_key)
    }

    /// Creates an unchecked, untitled item with a caller-provided id.
    pub fn with_id(id: ListItemId, sort_key: f64) -> Self {
        Self {
            id,
            title: String::new(),
            is_checked: false,
            sort_key,
        }
    }

    /// Validates id and sort key.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        ensure_finite_sort_key(self.sort_key)
    }
}
