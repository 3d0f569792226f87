//! Planner event model.
//!
//! # Responsibility
//! - Represent one entry of a day's task list, optionally timed.
//! - Mirror the device-calendar fields of events imported from a calendar.
//!
//! # Invariants
//! - `datestamp` is a strict `YYYY-MM-DD`.
//! - `start_iso`/`end_iso` are canonical UTC ISO strings, so comparing them
//!   as strings is comparing them chronologically.
//! - `end_iso >= start_iso` for calendar-backed events.

use super::list_item::{ListItem, ListItemId};
use super::validation::{ensure_canonical_iso, parse_datestamp, ModelValidationError};
use crate::order::OrderableItem;
use serde::{Deserialize, Serialize};

/// Links the two day-records that make up a multi-day calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiDayConfig {
    pub start_event_id: String,
    pub end_event_id: String,
}

/// Persisted mirror of a device-calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub end_iso: String,
    pub calendar_event_id: String,
    pub calendar_id: String,
    pub is_all_day: bool,
    pub multi_day: Option<MultiDayConfig>,
}

/// Time assigned to a planner event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConfig {
    pub start_iso: String,
    pub calendar: Option<CalendarConfig>,
}

impl TimeConfig {
    /// Creates a plain start-time config without calendar linkage.
    pub fn starting_at(start_iso: impl Into<String>) -> Self {
        Self {
            start_iso: start_iso.into(),
            calendar: None,
        }
    }
}

/// One entry of a day's planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerEvent {
    #[serde(flatten)]
    pub item: ListItem,
    /// Day this event belongs to.
    pub datestamp: String,
    pub time_config: Option<TimeConfig>,
    /// Stored only; recurrence is not expanded by core.
    pub recurring_id: Option<String>,
}

impl PlannerEvent {
    /// Creates an untimed, untitled event for `datestamp`.
    pub fn new(datestamp: impl Into<String>, sort_key: f64) -> Self {
        Self {
            item: ListItem::new(sort_key),
            datestamp: datestamp.into(),
            time_config: None,
            recurring_id: None,
        }
    }

    pub fn id(&self) -> ListItemId {
        self.item.id
    }

    /// Returns the instant this event is ordered by.
    ///
    /// The end record of a multi-day span is ordered by the span's end;
    /// every other timed event by its start.
    pub fn event_time(&self) -> Option<&str> {
        let time_config = self.time_config.as_ref()?;
        if let Some(calendar) = &time_config.calendar {
            let is_end_record = calendar
                .multi_day
                .as_ref()
                .is_some_and(|multi_day| multi_day.end_event_id == self.item.id.to_string());
            if is_end_record {
                return Some(calendar.end_iso.as_str());
            }
        }
        Some(time_config.start_iso.as_str())
    }

    /// Whether this event mirrors a device-calendar event.
    pub fn is_calendar_backed(&self) -> bool {
        self.time_config
            .as_ref()
            .is_some_and(|time_config| time_config.calendar.is_some())
    }

    /// Validates identity, day and time invariants.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        self.item.validate()?;
        parse_datestamp(&self.datestamp)?;

        if let Some(time_config) = &self.time_config {
            ensure_canonical_iso(&time_config.start_iso)?;
            if let Some(calendar) = &time_config.calendar {
                ensure_canonical_iso(&calendar.end_iso)?;
                if calendar.end_iso < time_config.start_iso {
                    return Err(ModelValidationError::CalendarEndBeforeStart {
                        start: time_config.start_iso.clone(),
                        end: calendar.end_iso.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl OrderableItem for PlannerEvent {
    type Id = ListItemId;

    fn item_id(&self) -> &Self::Id {
        &self.item.id
    }

    fn sort_key(&self) -> f64 {
        self.item.sort_key
    }

    fn occurs_at(&self) -> Option<&str> {
        self.event_time()
    }
}
