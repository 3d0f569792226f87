//! Planner day/event repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist day planners and their events.
//! - Flatten `TimeConfig`/`CalendarConfig` into nullable columns and back.
//!
//! # Invariants
//! - An event's day row exists before the event row (created on demand).
//! - Deleting a day cascades to its events through the foreign key.
//! - Event listing is deterministic: `sort_key ASC, rowid ASC`.

use super::{ensure_connection_ready, parse_flag, parse_uuid, RepoError, RepoResult};
use crate::model::list_item::{ListItem, ListItemId};
use crate::model::planner::Planner;
use crate::model::planner_event::{CalendarConfig, MultiDayConfig, PlannerEvent, TimeConfig};
use crate::model::validation::{parse_datestamp, ModelValidationError};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const EVENT_SELECT_SQL: &str = "SELECT
    uuid,
    datestamp,
    title,
    is_checked,
    sort_key,
    start_iso,
    end_iso,
    calendar_event_id,
    calendar_id,
    is_all_day,
    multi_day_start_id,
    multi_day_end_id,
    recurring_id
FROM planner_events";

const EVENT_COLUMNS: &[&str] = &[
    "uuid",
    "datestamp",
    "title",
    "is_checked",
    "sort_key",
    "start_iso",
    "end_iso",
    "calendar_event_id",
    "calendar_id",
    "is_all_day",
    "multi_day_start_id",
    "multi_day_end_id",
    "recurring_id",
];

/// Repository interface for day planners and planner events.
pub trait PlannerEventRepository {
    /// Creates the day row when missing.
    fn ensure_planner(&self, datestamp: &str) -> RepoResult<()>;
    /// Lists every day that has a planner row, ascending.
    fn list_planners(&self) -> RepoResult<Vec<Planner>>;
    /// Deletes one day and all its events. Returns whether a day existed.
    fn delete_planner(&self, datestamp: &str) -> RepoResult<bool>;
    /// Inserts one event, creating its day row when missing.
    fn create_event(&self, event: &PlannerEvent) -> RepoResult<()>;
    /// Loads one event by id.
    fn get_event(&self, id: ListItemId) -> RepoResult<Option<PlannerEvent>>;
    /// Lists one day's events in ascending key order.
    fn list_events(&self, datestamp: &str, include_checked: bool)
        -> RepoResult<Vec<PlannerEvent>>;
    /// Replaces title, checked flag, key, time and recurrence fields.
    fn update_event(&self, event: &PlannerEvent) -> RepoResult<()>;
    /// Updates one event's sort key.
    fn set_sort_key(&self, id: ListItemId, sort_key: f64) -> RepoResult<()>;
    /// Updates several sort keys atomically.
    fn set_sort_keys(&self, updates: &[(ListItemId, f64)]) -> RepoResult<()>;
    /// Hard-deletes one event.
    fn delete_event(&self, id: ListItemId) -> RepoResult<()>;
}

/// SQLite-backed planner repository.
pub struct SqlitePlannerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlannerRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "planners", &["datestamp"])?;
        ensure_connection_ready(conn, "planner_events", EVENT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl PlannerEventRepository for SqlitePlannerRepository<'_> {
    fn ensure_planner(&self, datestamp: &str) -> RepoResult<()> {
        parse_datestamp(datestamp)?;
        insert_planner_if_missing(self.conn, datestamp)
    }

    fn list_planners(&self) -> RepoResult<Vec<Planner>> {
        let mut stmt = self.conn.prepare(
            "SELECT datestamp
             FROM planners
             ORDER BY datestamp ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut planners = Vec::new();
        while let Some(row) = rows.next()? {
            planners.push(Planner::new(row.get::<_, String>(0)?)?);
        }
        Ok(planners)
    }

    fn delete_planner(&self, datestamp: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM planners WHERE datestamp = ?1;", [datestamp])?;
        Ok(changed > 0)
    }

    fn create_event(&self, event: &PlannerEvent) -> RepoResult<()> {
        event.validate()?;
        let columns = TimeColumns::from_event(event);

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        insert_planner_if_missing(&tx, &event.datestamp)?;
        tx.execute(
            "INSERT INTO planner_events (
                uuid,
                datestamp,
                title,
                is_checked,
                sort_key,
                start_iso,
                end_iso,
                calendar_event_id,
                calendar_id,
                is_all_day,
                multi_day_start_id,
                multi_day_end_id,
                recurring_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                event.item.id.to_string(),
                event.datestamp,
                event.item.title,
                event.item.is_checked as i64,
                event.item.sort_key,
                columns.start_iso,
                columns.end_iso,
                columns.calendar_event_id,
                columns.calendar_id,
                columns.is_all_day,
                columns.multi_day_start_id,
                columns.multi_day_end_id,
                event.recurring_id,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_event(&self, id: ListItemId) -> RepoResult<Option<PlannerEvent>> {
        let sql = format!("{EVENT_SELECT_SQL} WHERE uuid = ?1;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }
        Ok(None)
    }

    fn list_events(
        &self,
        datestamp: &str,
        include_checked: bool,
    ) -> RepoResult<Vec<PlannerEvent>> {
        let sql = format!(
            "{EVENT_SELECT_SQL}
             WHERE datestamp = ?1
               AND (?2 = 1 OR is_checked = 0)
             ORDER BY sort_key ASC, rowid ASC;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![datestamp, include_checked as i64])?;

        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn update_event(&self, event: &PlannerEvent) -> RepoResult<()> {
        event.validate()?;
        let columns = TimeColumns::from_event(event);

        let changed = self.conn.execute(
            "UPDATE planner_events
             SET title = ?2,
                 is_checked = ?3,
                 sort_key = ?4,
                 start_iso = ?5,
                 end_iso = ?6,
                 calendar_event_id = ?7,
                 calendar_id = ?8,
                 is_all_day = ?9,
                 multi_day_start_id = ?10,
                 multi_day_end_id = ?11,
                 recurring_id = ?12,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                event.item.id.to_string(),
                event.item.title,
                event.item.is_checked as i64,
                event.item.sort_key,
                columns.start_iso,
                columns.end_iso,
                columns.calendar_event_id,
                columns.calendar_id,
                columns.is_all_day,
                columns.multi_day_start_id,
                columns.multi_day_end_id,
                event.recurring_id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(event.item.id));
        }
        Ok(())
    }

    fn set_sort_key(&self, id: ListItemId, sort_key: f64) -> RepoResult<()> {
        update_sort_key(self.conn, id, sort_key)
    }

    fn set_sort_keys(&self, updates: &[(ListItemId, f64)]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (id, sort_key) in updates {
            update_sort_key(&tx, *id, *sort_key)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_event(&self, id: ListItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM planner_events WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

/// Nullable column projection of an event's time fields.
struct TimeColumns<'a> {
    start_iso: Option<&'a str>,
    end_iso: Option<&'a str>,
    calendar_event_id: Option<&'a str>,
    calendar_id: Option<&'a str>,
    is_all_day: Option<i64>,
    multi_day_start_id: Option<&'a str>,
    multi_day_end_id: Option<&'a str>,
}

impl<'a> TimeColumns<'a> {
    fn from_event(event: &'a PlannerEvent) -> Self {
        let time_config = event.time_config.as_ref();
        let calendar = time_config.and_then(|config| config.calendar.as_ref());
        let multi_day = calendar.and_then(|calendar| calendar.multi_day.as_ref());
        Self {
            start_iso: time_config.map(|config| config.start_iso.as_str()),
            end_iso: calendar.map(|calendar| calendar.end_iso.as_str()),
            calendar_event_id: calendar.map(|calendar| calendar.calendar_event_id.as_str()),
            calendar_id: calendar.map(|calendar| calendar.calendar_id.as_str()),
            is_all_day: calendar.map(|calendar| calendar.is_all_day as i64),
            multi_day_start_id: multi_day.map(|multi_day| multi_day.start_event_id.as_str()),
            multi_day_end_id: multi_day.map(|multi_day| multi_day.end_event_id.as_str()),
        }
    }
}

fn insert_planner_if_missing(conn: &Connection, datestamp: &str) -> RepoResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO planners (datestamp) VALUES (?1);",
        [datestamp],
    )?;
    Ok(())
}

fn update_sort_key(conn: &Connection, id: ListItemId, sort_key: f64) -> RepoResult<()> {
    if !sort_key.is_finite() {
        return Err(ModelValidationError::NonFiniteSortKey(sort_key).into());
    }
    let changed = conn.execute(
        "UPDATE planner_events
         SET sort_key = ?2,
             updated_at = (strftime('%s', 'now') * 1000)
         WHERE uuid = ?1;",
        params![id.to_string(), sort_key],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }
    Ok(())
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<PlannerEvent> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "planner_events.uuid")?;
    let is_checked = parse_flag(row.get("is_checked")?, "planner_events.is_checked")?;

    Ok(PlannerEvent {
        item: ListItem {
            id,
            title: row.get("title")?,
            is_checked,
            sort_key: row.get("sort_key")?,
        },
        datestamp: row.get("datestamp")?,
        time_config: parse_time_config(row)?,
        recurring_id: row.get("recurring_id")?,
    })
}

fn parse_time_config(row: &Row<'_>) -> RepoResult<Option<TimeConfig>> {
    let Some(start_iso) = row.get::<_, Option<String>>("start_iso")? else {
        return Ok(None);
    };
    let Some(calendar_event_id) = row.get::<_, Option<String>>("calendar_event_id")? else {
        return Ok(Some(TimeConfig::starting_at(start_iso)));
    };

    let end_iso: Option<String> = row.get("end_iso")?;
    let calendar_id: Option<String> = row.get("calendar_id")?;
    let is_all_day: Option<i64> = row.get("is_all_day")?;
    let (Some(end_iso), Some(calendar_id), Some(is_all_day)) = (end_iso, calendar_id, is_all_day)
    else {
        return Err(RepoError::InvalidData(format!(
            "incomplete calendar config for calendar event `{calendar_event_id}` in planner_events"
        )));
    };

    let multi_day_start: Option<String> = row.get("multi_day_start_id")?;
    let multi_day_end: Option<String> = row.get("multi_day_end_id")?;
    let multi_day = match (multi_day_start, multi_day_end) {
        (Some(start_event_id), Some(end_event_id)) => Some(MultiDayConfig {
            start_event_id,
            end_event_id,
        }),
        (None, None) => None,
        _ => {
            return Err(RepoError::InvalidData(
                "multi-day config requires both start and end ids in planner_events".to_string(),
            ));
        }
    };

    Ok(Some(TimeConfig {
        start_iso,
        calendar: Some(CalendarConfig {
            end_iso,
            calendar_event_id,
            calendar_id,
            is_all_day: parse_flag(is_all_day, "planner_events.is_all_day")?,
            multi_day,
        }),
    }))
}
