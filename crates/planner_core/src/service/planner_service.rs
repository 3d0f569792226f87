//! Planner use-case service.
//!
//! # Responsibility
//! - Create, move, retitle, time, check and delete planner events.
//! - Keep each day's unchecked events in manual order that agrees with
//!   time-of-day order for timed events.
//!
//! # Invariants
//! - Sort keys are computed only by `crate::order`; this layer persists them.
//! - Only the unchecked events of one day are siblings for ordering.
//! - Reconciliation persists a key only when it differs from the current one
//!   and never rewrites another event's key.
//! - Titles are never logged.

use crate::context::PlannerContext;
use crate::model::list_item::ListItemId;
use crate::model::planner::Planner;
use crate::model::planner_event::{PlannerEvent, TimeConfig};
use crate::model::validation::parse_datestamp;
use crate::order::{compute_insertion_key, compute_reconciled_key, sort_keys_for_len};
use crate::repo::planner_repo::PlannerEventRepository;
use crate::repo::RepoError;
use crate::service::warn_on_exhausted_gap;
use crate::text::time_phrase::extract_time_phrase;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from planner service operations.
#[derive(Debug)]
pub enum PlannerServiceError {
    /// Datestamp is not `YYYY-MM-DD`.
    InvalidDatestamp(String),
    /// Clock time is not a valid `HH:MM`.
    InvalidTime(String),
    /// Target event does not exist.
    EventNotFound(ListItemId),
    /// Checked events are not part of the orderable list.
    EventChecked(ListItemId),
    /// Time of a calendar-backed event is owned by the calendar mirror.
    CalendarManaged(ListItemId),
    /// New events are not created next to an untitled one.
    UntitledNeighbor(ListItemId),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for PlannerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDatestamp(value) => {
                write!(f, "datestamp must be YYYY-MM-DD, got `{value}`")
            }
            Self::InvalidTime(value) => write!(f, "time must be HH:MM, got `{value}`"),
            Self::EventNotFound(id) => write!(f, "planner event not found: {id}"),
            Self::EventChecked(id) => write!(f, "planner event is checked: {id}"),
            Self::CalendarManaged(id) => {
                write!(f, "planner event time is managed by its calendar: {id}")
            }
            Self::UntitledNeighbor(id) => {
                write!(f, "cannot create an event next to untitled event: {id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlannerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PlannerServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EventNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type PlannerServiceResult<T> = Result<T, PlannerServiceError>;

/// Keys produced by a drag-reorder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Key placing the event at the requested index.
    pub manual_key: f64,
    /// Key after the chronological pass; equals `manual_key` when the drop
    /// position already agreed with the event's time.
    pub final_key: f64,
}

impl MoveOutcome {
    /// Whether the chronological pass overrode the manual drop position.
    pub fn was_reconciled(&self) -> bool {
        self.manual_key != self.final_key
    }
}

/// Result of an edit that may reposition the event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventUpdate {
    /// Event as persisted.
    pub event: PlannerEvent,
    /// `HH:MM` pulled out of the title, when the edit assigned one.
    pub extracted_time: Option<String>,
    /// Whether the sort key changed; UIs scroll to the event when set.
    pub repositioned: bool,
}

/// Planner service facade.
pub struct PlannerService<R: PlannerEventRepository> {
    repo: R,
    context: PlannerContext,
}

impl<R: PlannerEventRepository> PlannerService<R> {
    /// Creates service from repository implementation and context.
    pub fn new(repo: R, context: PlannerContext) -> Self {
        Self { repo, context }
    }

    pub fn context(&self) -> &PlannerContext {
        &self.context
    }

    /// Lists all days with a planner.
    pub fn list_planners(&self) -> PlannerServiceResult<Vec<Planner>> {
        self.repo.list_planners().map_err(Into::into)
    }

    /// Creates the day's planner when missing and returns it.
    pub fn ensure_day(&self, datestamp: &str) -> PlannerServiceResult<Planner> {
        let planner = Planner::new(datestamp)
            .map_err(|_| PlannerServiceError::InvalidDatestamp(datestamp.to_string()))?;
        self.repo.ensure_planner(datestamp)?;
        Ok(planner)
    }

    /// Lists every event of one day, checked ones included, in key order.
    pub fn list_day(&self, datestamp: &str) -> PlannerServiceResult<Vec<PlannerEvent>> {
        ensure_datestamp(datestamp)?;
        self.repo.list_events(datestamp, true).map_err(Into::into)
    }

    /// Lists the orderable (unchecked) events of one day in key order.
    pub fn list_unchecked(&self, datestamp: &str) -> PlannerServiceResult<Vec<PlannerEvent>> {
        ensure_datestamp(datestamp)?;
        self.repo.list_events(datestamp, false).map_err(Into::into)
    }

    /// Creates an event at display `index` among the day's unchecked events.
    ///
    /// A title carrying a time phrase is handled like a title edit, so the
    /// event may end up at its chronological position instead of `index`.
    /// A blank title creates an untitled event; no further event may be
    /// created right above or below it until it gets a title.
    pub fn create_event(
        &self,
        datestamp: &str,
        index: usize,
        title: impl Into<String>,
    ) -> PlannerServiceResult<EventUpdate> {
        ensure_datestamp(datestamp)?;
        let siblings = self.repo.list_events(datestamp, false)?;
        if let Some(untitled) = untitled_neighbor(&siblings, index) {
            return Err(PlannerServiceError::UntitledNeighbor(untitled));
        }
        let sort_key = compute_insertion_key(index, &siblings);
        warn_on_exhausted_gap(&siblings, sort_key, format_args!("day:{datestamp}"));

        let event = PlannerEvent::new(datestamp, sort_key);
        self.repo.create_event(&event)?;
        info!(
            "event=planner_event_create module=service status=ok datestamp={} index={} sort_key={}",
            datestamp, index, sort_key
        );

        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            return Ok(EventUpdate {
                event,
                extracted_time: None,
                repositioned: false,
            });
        }
        self.commit_title(event, title)
    }

    /// Moves an unchecked event to display index `to_index`.
    ///
    /// The manual key is persisted first; a second pass then restores
    /// chronological order if the drop put a timed event out of place.
    pub fn move_event(&self, id: ListItemId, to_index: usize) -> PlannerServiceResult<MoveOutcome> {
        let mut event = self.get_event(id)?;
        if event.item.is_checked {
            return Err(PlannerServiceError::EventChecked(id));
        }

        let mut siblings = self.repo.list_events(&event.datestamp, false)?;
        let from_index = siblings.iter().position(|sibling| sibling.id() == id);
        if from_index == Some(to_index) {
            return Ok(MoveOutcome {
                manual_key: event.item.sort_key,
                final_key: event.item.sort_key,
            });
        }

        siblings.retain(|sibling| sibling.id() != id);
        let manual_key = compute_insertion_key(to_index, &siblings);
        warn_on_exhausted_gap(
            &siblings,
            manual_key,
            format_args!("day:{}", event.datestamp),
        );
        self.repo.set_sort_key(id, manual_key)?;
        event.item.sort_key = manual_key;

        siblings.push(event.clone());
        let final_key = compute_reconciled_key(&event, &siblings);
        if final_key != manual_key {
            self.repo.set_sort_key(id, final_key)?;
        }

        info!(
            "event=planner_event_move module=service status=ok event_id={} to_index={} manual_key={} final_key={}",
            id, to_index, manual_key, final_key
        );
        Ok(MoveOutcome {
            manual_key,
            final_key,
        })
    }

    /// Commits an edited title.
    ///
    /// The title is trimmed; a blank result deletes the event and returns
    /// `None`. When the event has no time yet and the title contains a time
    /// phrase, the phrase is removed from the title, the time is assigned on
    /// the event's day and the event is reconciled into chronological
    /// position.
    pub fn apply_title_edit(
        &self,
        id: ListItemId,
        title: impl Into<String>,
    ) -> PlannerServiceResult<Option<EventUpdate>> {
        let event = self.get_event(id)?;
        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            self.repo.delete_event(id)?;
            info!(
                "event=planner_event_delete module=service status=ok event_id={} reason=blank_title",
                id
            );
            return Ok(None);
        }
        self.commit_title(event, title).map(Some)
    }

    /// Assigns (`Some("HH:MM")`) or clears (`None`) an event's time, then
    /// reconciles its position.
    pub fn set_event_time(
        &self,
        id: ListItemId,
        time_24h: Option<&str>,
    ) -> PlannerServiceResult<EventUpdate> {
        let mut event = self.get_event(id)?;
        if event.is_calendar_backed() {
            return Err(PlannerServiceError::CalendarManaged(id));
        }

        event.time_config = match time_24h {
            Some(time) => {
                let start_iso = self
                    .context
                    .local_time_to_utc_iso(&event.datestamp, time)
                    .ok_or_else(|| PlannerServiceError::InvalidTime(time.to_string()))?;
                Some(TimeConfig::starting_at(start_iso))
            }
            None => None,
        };

        let repositioned = self.reconcile_in_place(&mut event)?;
        self.repo.update_event(&event)?;
        info!(
            "event=planner_event_time module=service status=ok event_id={} timed={} repositioned={}",
            id,
            time_24h.is_some(),
            repositioned
        );

        Ok(EventUpdate {
            event,
            extracted_time: time_24h.map(str::to_string),
            repositioned,
        })
    }

    /// Checks or unchecks an event. The sort key is kept, so an unchecked
    /// event returns to its previous slot unless its time changed while it
    /// was checked; then it is reconciled like a fresh time assignment.
    pub fn set_event_checked(
        &self,
        id: ListItemId,
        is_checked: bool,
    ) -> PlannerServiceResult<EventUpdate> {
        let mut event = self.get_event(id)?;
        if event.item.is_checked == is_checked {
            return Ok(EventUpdate {
                event,
                extracted_time: None,
                repositioned: false,
            });
        }
        event.item.is_checked = is_checked;
        let repositioned = !is_checked && self.reconcile_in_place(&mut event)?;
        self.repo.update_event(&event)?;
        debug!(
            "event=planner_event_check module=service status=ok event_id={} checked={} repositioned={}",
            id, is_checked, repositioned
        );
        Ok(EventUpdate {
            event,
            extracted_time: None,
            repositioned,
        })
    }

    /// Deletes one event.
    pub fn delete_event(&self, id: ListItemId) -> PlannerServiceResult<()> {
        self.repo.delete_event(id)?;
        info!(
            "event=planner_event_delete module=service status=ok event_id={}",
            id
        );
        Ok(())
    }

    /// Deletes one day and all its events. Returns whether the day existed.
    pub fn delete_day(&self, datestamp: &str) -> PlannerServiceResult<bool> {
        ensure_datestamp(datestamp)?;
        let existed = self.repo.delete_planner(datestamp)?;
        info!(
            "event=planner_day_delete module=service status=ok datestamp={} existed={}",
            datestamp, existed
        );
        Ok(existed)
    }

    /// Rewrites the day's unchecked keys to `8, 16, 24, ...` keeping order.
    ///
    /// Explicit repair for lists whose gaps were split until keys tied.
    /// Returns the number of events rewritten.
    pub fn compact_day(&self, datestamp: &str) -> PlannerServiceResult<usize> {
        ensure_datestamp(datestamp)?;
        let siblings = self.repo.list_events(datestamp, false)?;
        let updates: Vec<(ListItemId, f64)> = siblings
            .iter()
            .map(PlannerEvent::id)
            .zip(sort_keys_for_len(siblings.len()))
            .collect();
        self.repo.set_sort_keys(&updates)?;
        info!(
            "event=planner_day_compact module=service status=ok datestamp={} count={}",
            datestamp,
            updates.len()
        );
        Ok(updates.len())
    }

    /// Loads one event.
    pub fn get_event(&self, id: ListItemId) -> PlannerServiceResult<PlannerEvent> {
        self.repo
            .get_event(id)?
            .ok_or(PlannerServiceError::EventNotFound(id))
    }

    /// Stores a trimmed, non-blank title, extracting a time phrase for
    /// untimed events.
    fn commit_title(
        &self,
        mut event: PlannerEvent,
        title: &str,
    ) -> PlannerServiceResult<EventUpdate> {
        event.item.title = title.to_string();

        let mut extracted_time = None;
        if event.time_config.is_none() {
            if let Some(extracted) = extract_time_phrase(title) {
                if let Some(start_iso) = self
                    .context
                    .local_time_to_utc_iso(&event.datestamp, &extracted.time_24h)
                {
                    event.item.title = extracted.remaining_text.trim().to_string();
                    event.time_config = Some(TimeConfig::starting_at(start_iso));
                    extracted_time = Some(extracted.time_24h);
                }
            }
        }

        let repositioned = extracted_time.is_some() && self.reconcile_in_place(&mut event)?;
        self.repo.update_event(&event)?;
        debug!(
            "event=planner_title_edit module=service status=ok event_id={} time_extracted={} repositioned={}",
            event.id(),
            extracted_time.is_some(),
            repositioned
        );

        Ok(EventUpdate {
            event,
            extracted_time,
            repositioned,
        })
    }

    /// Reconciles `event` (already carrying its new time) against its
    /// persisted siblings and updates its key in memory.
    ///
    /// Returns whether the key changed. Checked events are left alone.
    fn reconcile_in_place(&self, event: &mut PlannerEvent) -> PlannerServiceResult<bool> {
        if event.item.is_checked {
            return Ok(false);
        }

        let mut siblings = self.repo.list_events(&event.datestamp, false)?;
        match siblings.iter_mut().find(|sibling| sibling.id() == event.id()) {
            Some(stored) => *stored = event.clone(),
            None => siblings.push(event.clone()),
        }

        let reconciled_key = compute_reconciled_key(&*event, &siblings);
        if reconciled_key == event.item.sort_key {
            return Ok(false);
        }
        event.item.sort_key = reconciled_key;
        Ok(true)
    }
}

fn ensure_datestamp(datestamp: &str) -> PlannerServiceResult<()> {
    parse_datestamp(datestamp)
        .map(|_| ())
        .map_err(|_| PlannerServiceError::InvalidDatestamp(datestamp.to_string()))
}

/// Returns the untitled unchecked event directly above or below display
/// `index`, if any.
fn untitled_neighbor(siblings: &[PlannerEvent], index: usize) -> Option<ListItemId> {
    let index = index.min(siblings.len());
    let above = index.checked_sub(1).and_then(|above| siblings.get(above));
    let below = siblings.get(index);
    [above, below]
        .into_iter()
        .flatten()
        .find(|sibling| sibling.item.title.trim().is_empty())
        .map(PlannerEvent::id)
}
