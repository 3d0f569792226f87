//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose planner and checklist use-cases to Dart via FRB.
//! - Flatten core results into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures surface as `ok = false` plus a message, never as a crash.
//! - The UI owns the time zone; timed calls carry `utc_offset_minutes`.

use log::warn;
use planner_core::db::open_db;
use planner_core::{
    core_version as core_version_inner, default_log_level as default_log_level_inner,
    init_logging as init_logging_inner, ping as ping_inner,
    ChecklistColor, ChecklistDraft, ChecklistItem, ChecklistItemKind, ChecklistService,
    ChecklistServiceError, ListItemId, PlannerContext, PlannerEvent, PlannerService,
    PlannerServiceError, SqliteChecklistRepository, SqlitePlannerRepository,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const PLANNER_DB_FILE_NAME: &str = "planner.sqlite3";
static PLANNER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Log level matching the core build mode (`debug` or `info`).
#[flutter_rust_bridge::frb(sync)]
pub fn default_log_level() -> String {
    default_log_level_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Planner event projection for list rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerEventItem {
    pub event_id: String,
    pub datestamp: String,
    pub title: String,
    pub is_checked: bool,
    pub sort_key: f64,
    /// Canonical UTC instant used for ordering, if timed.
    pub time_iso: Option<String>,
    /// Local 12-hour label such as `9:30 AM`, if timed.
    pub time_label: Option<String>,
    pub is_calendar_backed: bool,
}

/// Day listing envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerDayResponse {
    pub ok: bool,
    /// Events in display order, checked ones included.
    pub items: Vec<PlannerEventItem>,
    pub message: String,
}

/// Envelope for planner commands.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerActionResponse {
    pub ok: bool,
    /// Event after the command; `None` on failure or delete.
    pub event: Option<PlannerEventItem>,
    /// Whether the chronological pass moved the event; UIs scroll to it.
    pub repositioned: bool,
    pub message: String,
}

impl PlannerActionResponse {
    fn success(message: impl Into<String>, event: Option<PlannerEventItem>, repositioned: bool) -> Self {
        Self {
            ok: true,
            event,
            repositioned,
            message: message.into(),
        }
    }

    fn failure(op: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        warn!("event=ffi_call module=ffi status=error op={op}");
        Self {
            ok: false,
            event: None,
            repositioned: false,
            message: format!("{op} failed: {message}"),
        }
    }
}

/// Checklist entry projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistEntryItem {
    pub entry_id: String,
    pub parent_id: Option<String>,
    /// `folder|checklist|item`.
    pub kind: String,
    pub color: String,
    pub title: String,
    pub is_checked: bool,
    pub sort_key: f64,
}

/// Checklist listing envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistListResponse {
    pub ok: bool,
    pub items: Vec<ChecklistEntryItem>,
    pub message: String,
}

/// Envelope for checklist commands.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistActionResponse {
    pub ok: bool,
    pub entry_id: Option<String>,
    /// Entry sort key after the command.
    pub sort_key: Option<f64>,
    pub message: String,
}

impl ChecklistActionResponse {
    fn success(message: impl Into<String>, entry_id: String, sort_key: Option<f64>) -> Self {
        Self {
            ok: true,
            entry_id: Some(entry_id),
            sort_key,
            message: message.into(),
        }
    }

    fn failure(op: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        warn!("event=ffi_call module=ffi status=error op={op}");
        Self {
            ok: false,
            entry_id: None,
            sort_key: None,
            message: format!("{op} failed: {message}"),
        }
    }
}

/// Lists one day's events in display order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Read-only: an unseen day yields an empty list and no planner row.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_list_day(datestamp: String, utc_offset_minutes: i32) -> PlannerDayResponse {
    let result = with_planner_service(utc_offset_minutes, |service| {
        let events = service.list_day(datestamp.trim())?;
        Ok(events
            .iter()
            .map(|event| to_event_item(service.context(), event))
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => {
            let message = format!("{} event(s).", items.len());
            PlannerDayResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op=planner_list_day");
            PlannerDayResponse {
                ok: false,
                items: Vec::new(),
                message: format!("planner_list_day failed: {err}"),
            }
        }
    }
}

/// Creates an event at display `index` among the day's unchecked events.
///
/// A time phrase in `title` (`"Lunch 12pm"`) assigns the time and may place
/// the event at its chronological position instead.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_create_event(
    datestamp: String,
    index: u32,
    title: String,
    utc_offset_minutes: i32,
) -> PlannerActionResponse {
    const OP: &str = "planner_create_event";
    let result = with_planner_service(utc_offset_minutes, |service| {
        let update = service.create_event(datestamp.trim(), index as usize, title)?;
        Ok((
            to_event_item(service.context(), &update.event),
            update.repositioned,
        ))
    });
    match result {
        Ok((item, repositioned)) => {
            PlannerActionResponse::success("Event created.", Some(item), repositioned)
        }
        Err(err) => PlannerActionResponse::failure(OP, err),
    }
}

/// Drag-reorders an unchecked event to display index `to_index`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_move_event(
    event_id: String,
    to_index: u32,
    utc_offset_minutes: i32,
) -> PlannerActionResponse {
    const OP: &str = "planner_move_event";
    let id = match parse_id(&event_id) {
        Ok(id) => id,
        Err(err) => return PlannerActionResponse::failure(OP, err),
    };
    let result = with_planner_service(utc_offset_minutes, |service| {
        let outcome = service.move_event(id, to_index as usize)?;
        let event = service.get_event(id)?;
        Ok((
            to_event_item(service.context(), &event),
            outcome.was_reconciled(),
        ))
    });
    match result {
        Ok((item, repositioned)) => {
            PlannerActionResponse::success("Event moved.", Some(item), repositioned)
        }
        Err(err) => PlannerActionResponse::failure(OP, err),
    }
}

/// Stores an edited title, extracting a time phrase for untimed events.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_edit_title(
    event_id: String,
    title: String,
    utc_offset_minutes: i32,
) -> PlannerActionResponse {
    const OP: &str = "planner_edit_title";
    let id = match parse_id(&event_id) {
        Ok(id) => id,
        Err(err) => return PlannerActionResponse::failure(OP, err),
    };
    let result = with_planner_service(utc_offset_minutes, |service| {
        let update = service.apply_title_edit(id, title)?;
        Ok(update.map(|update| {
            (
                to_event_item(service.context(), &update.event),
                update.repositioned,
            )
        }))
    });
    match result {
        Ok(Some((item, repositioned))) => {
            PlannerActionResponse::success("Title saved.", Some(item), repositioned)
        }
        Ok(None) => PlannerActionResponse::success("Event deleted.", None, false),
        Err(err) => PlannerActionResponse::failure(OP, err),
    }
}

/// Assigns (`Some("HH:MM")`, local time) or clears (`None`) an event's time.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_time(
    event_id: String,
    time_24h: Option<String>,
    utc_offset_minutes: i32,
) -> PlannerActionResponse {
    const OP: &str = "planner_set_time";
    let id = match parse_id(&event_id) {
        Ok(id) => id,
        Err(err) => return PlannerActionResponse::failure(OP, err),
    };
    let time_24h = time_24h
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let result = with_planner_service(utc_offset_minutes, |service| {
        let update = service.set_event_time(id, time_24h.as_deref())?;
        Ok((
            to_event_item(service.context(), &update.event),
            update.repositioned,
        ))
    });
    match result {
        Ok((item, repositioned)) => {
            PlannerActionResponse::success("Time saved.", Some(item), repositioned)
        }
        Err(err) => PlannerActionResponse::failure(OP, err),
    }
}

/// Checks or unchecks an event.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_checked(
    event_id: String,
    is_checked: bool,
    utc_offset_minutes: i32,
) -> PlannerActionResponse {
    const OP: &str = "planner_set_checked";
    let id = match parse_id(&event_id) {
        Ok(id) => id,
        Err(err) => return PlannerActionResponse::failure(OP, err),
    };
    let result = with_planner_service(utc_offset_minutes, |service| {
        let update = service.set_event_checked(id, is_checked)?;
        Ok((
            to_event_item(service.context(), &update.event),
            update.repositioned,
        ))
    });
    match result {
        Ok((item, repositioned)) => {
            PlannerActionResponse::success("Event updated.", Some(item), repositioned)
        }
        Err(err) => PlannerActionResponse::failure(OP, err),
    }
}

/// Deletes one event.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_event(event_id: String) -> PlannerActionResponse {
    const OP: &str = "planner_delete_event";
    let id = match parse_id(&event_id) {
        Ok(id) => id,
        Err(err) => return PlannerActionResponse::failure(OP, err),
    };
    // Deleting needs no clock; any valid offset works.
    match with_planner_service(0, |service| service.delete_event(id)) {
        Ok(()) => PlannerActionResponse::success("Event deleted.", None, false),
        Err(err) => PlannerActionResponse::failure(OP, err),
    }
}

/// Lists the children of `parent_id` (`None` = top level).
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_list(parent_id: Option<String>) -> ChecklistListResponse {
    let result = parse_optional_id(parent_id.as_deref()).and_then(|parent_id| {
        with_checklist_service(|service| service.list_children(parent_id))
    });
    match result {
        Ok(entries) => {
            let items = entries.iter().map(to_entry_item).collect::<Vec<_>>();
            let message = format!("{} entr(ies).", items.len());
            ChecklistListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op=checklist_list");
            ChecklistListResponse {
                ok: false,
                items: Vec::new(),
                message: format!("checklist_list failed: {err}"),
            }
        }
    }
}

/// Creates a folder, checklist or item.
///
/// Input semantics:
/// - `kind`: `folder|checklist|item`.
/// - `color`: palette name; `None` keeps the default.
/// - `index`: display index among unchecked siblings; `None` appends.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_create_entry(
    parent_id: Option<String>,
    kind: String,
    title: String,
    color: Option<String>,
    index: Option<u32>,
) -> ChecklistActionResponse {
    const OP: &str = "checklist_create_entry";
    let Some(kind) = ChecklistItemKind::parse(kind.trim()) else {
        return ChecklistActionResponse::failure(OP, format!("unknown kind `{}`", kind.trim()));
    };
    let color = match color.as_deref().map(str::trim) {
        None | Some("") => ChecklistColor::default(),
        Some(value) => match ChecklistColor::parse(value) {
            Some(color) => color,
            None => {
                return ChecklistActionResponse::failure(OP, format!("unknown color `{value}`"))
            }
        },
    };
    let parent_id = match parse_optional_id(parent_id.as_deref()) {
        Ok(parent_id) => parent_id,
        Err(err) => return ChecklistActionResponse::failure(OP, err),
    };

    let draft = ChecklistDraft::new(kind, title, color);
    let result = with_checklist_service(|service| match index {
        Some(index) => service.create_entry_at(parent_id, index as usize, draft),
        None => service.create_entry(parent_id, draft),
    });
    match result {
        Ok(entry) => ChecklistActionResponse::success(
            "Entry created.",
            entry.id().to_string(),
            Some(entry.item.sort_key),
        ),
        Err(err) => ChecklistActionResponse::failure(OP, err),
    }
}

/// Drag-reorders an unchecked entry among its siblings.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_move_entry(entry_id: String, to_index: u32) -> ChecklistActionResponse {
    const OP: &str = "checklist_move_entry";
    let id = match parse_id(&entry_id) {
        Ok(id) => id,
        Err(err) => return ChecklistActionResponse::failure(OP, err),
    };
    match with_checklist_service(|service| service.move_entry(id, to_index as usize)) {
        Ok(sort_key) => {
            ChecklistActionResponse::success("Entry moved.", id.to_string(), Some(sort_key))
        }
        Err(err) => ChecklistActionResponse::failure(OP, err),
    }
}

/// Deletes an entry and everything below it.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_delete_entry(entry_id: String) -> ChecklistActionResponse {
    const OP: &str = "checklist_delete_entry";
    let id = match parse_id(&entry_id) {
        Ok(id) => id,
        Err(err) => return ChecklistActionResponse::failure(OP, err),
    };
    match with_checklist_service(|service| service.delete_entry(id)) {
        Ok(()) => ChecklistActionResponse::success("Entry deleted.", id.to_string(), None),
        Err(err) => ChecklistActionResponse::failure(OP, err),
    }
}

fn resolve_planner_db_path() -> PathBuf {
    PLANNER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("PLANNER_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PLANNER_DB_FILE_NAME)
        })
        .clone()
}

fn open_planner_db() -> Result<Connection, String> {
    open_db(resolve_planner_db_path()).map_err(|err| format!("planner DB open failed: {err}"))
}

fn with_planner_service<T>(
    utc_offset_minutes: i32,
    f: impl FnOnce(
        &PlannerService<SqlitePlannerRepository<'_>>,
    ) -> Result<T, PlannerServiceError>,
) -> Result<T, String> {
    let context = PlannerContext::now_with_offset_minutes(utc_offset_minutes)
        .ok_or_else(|| format!("utc offset out of range: {utc_offset_minutes} minutes"))?;
    let conn = open_planner_db()?;
    let repo = SqlitePlannerRepository::try_new(&conn)
        .map_err(|err| format!("planner repo init failed: {err}"))?;
    let service = PlannerService::new(repo, context);
    f(&service).map_err(|err| err.to_string())
}

fn with_checklist_service<T>(
    f: impl FnOnce(
        &ChecklistService<SqliteChecklistRepository<'_>>,
    ) -> Result<T, ChecklistServiceError>,
) -> Result<T, String> {
    let conn = open_planner_db()?;
    let repo = SqliteChecklistRepository::try_new(&conn)
        .map_err(|err| format!("checklist repo init failed: {err}"))?;
    let service = ChecklistService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

fn parse_id(value: &str) -> Result<ListItemId, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid id `{}`", value.trim()))
}

fn parse_optional_id(value: Option<&str>) -> Result<Option<ListItemId>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_id(value).map(Some),
    }
}

fn to_event_item(context: &PlannerContext, event: &PlannerEvent) -> PlannerEventItem {
    let time_iso = event.event_time().map(str::to_string);
    let time_label = time_iso
        .as_deref()
        .and_then(|iso| context.clock_label(iso))
        .map(|(clock, meridiem)| format!("{clock} {meridiem}"));
    PlannerEventItem {
        event_id: event.id().to_string(),
        datestamp: event.datestamp.clone(),
        title: event.item.title.clone(),
        is_checked: event.item.is_checked,
        sort_key: event.item.sort_key,
        time_iso,
        time_label,
        is_calendar_backed: event.is_calendar_backed(),
    }
}

fn to_entry_item(entry: &ChecklistItem) -> ChecklistEntryItem {
    ChecklistEntryItem {
        entry_id: entry.id().to_string(),
        parent_id: entry.parent_id.map(|value| value.to_string()),
        kind: entry.kind.as_str().to_string(),
        color: entry.color.as_str().to_string(),
        title: entry.item.title.clone(),
        is_checked: entry.item.is_checked,
        sort_key: entry.item.sort_key,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        checklist_create_entry, checklist_delete_entry, checklist_list, checklist_move_entry,
        core_version, default_log_level, init_logging, open_planner_db, planner_create_event,
        planner_delete_event, planner_edit_title, planner_list_day, planner_move_event,
        planner_set_checked, planner_set_time, ping, PLANNER_DB_FILE_NAME, PLANNER_DB_PATH,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::OnceLock;
    use tempfile::TempDir;

    static NEXT_DAY: AtomicU32 = AtomicU32::new(1);
    static TEST_DB_DIR: OnceLock<TempDir> = OnceLock::new();

    /// Points the bridge at a per-run temporary DB before first use.
    fn use_test_db() {
        let dir = TEST_DB_DIR.get_or_init(|| tempfile::tempdir().expect("create temp db dir"));
        let expected = dir.path().join(PLANNER_DB_FILE_NAME);
        let active = PLANNER_DB_PATH.get_or_init(|| expected.clone());
        assert_eq!(active, &expected, "planner DB path resolved before test setup");
    }

    /// Returns a datestamp no other test in this process uses.
    fn fresh_day() -> String {
        use_test_db();
        let day = NEXT_DAY.fetch_add(1, Ordering::SeqCst);
        format!("2199-01-{day:02}")
    }

    fn create(datestamp: &str, index: u32, title: &str) -> String {
        let response = planner_create_event(datestamp.to_string(), index, title.to_string(), 0);
        assert!(response.ok, "{}", response.message);
        response.event.expect("created event").event_id
    }

    fn day_titles(datestamp: &str) -> Vec<String> {
        let response = planner_list_day(datestamp.to_string(), 0);
        assert!(response.ok, "{}", response.message);
        response.items.into_iter().map(|item| item.title).collect()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn default_log_level_is_supported() {
        assert!(["debug", "info"].contains(&default_log_level().as_str()));
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn create_event_uses_default_key_then_appends() {
        let day = fresh_day();
        let first = planner_create_event(day.clone(), 0, "Plan".to_string(), 0);
        assert!(first.ok, "{}", first.message);
        assert_eq!(first.event.expect("event").sort_key, 8.0);

        let second = planner_create_event(day.clone(), 1, "Review".to_string(), 0);
        assert_eq!(second.event.expect("event").sort_key, 16.0);
        assert_eq!(day_titles(&day), vec!["Plan", "Review"]);
    }

    #[test]
    fn title_time_phrase_sets_time_and_label() {
        let day = fresh_day();
        let response = planner_create_event(day, 0, "Lunch 12pm".to_string(), -300);
        assert!(response.ok, "{}", response.message);
        let event = response.event.expect("event");
        assert_eq!(event.title, "Lunch");
        assert_eq!(event.time_label.as_deref(), Some("12:00 PM"));
        assert!(event.time_iso.is_some());
    }

    #[test]
    fn move_event_is_pulled_back_into_time_order() {
        let day = fresh_day();
        create(&day, 0, "Breakfast 8am");
        create(&day, 1, "Dinner 7pm");
        let lunch = create(&day, 2, "Lunch 12pm");
        assert_eq!(day_titles(&day), vec!["Breakfast", "Lunch", "Dinner"]);

        let moved = planner_move_event(lunch, 0, 0);
        assert!(moved.ok, "{}", moved.message);
        assert!(moved.repositioned);
        assert_eq!(day_titles(&day), vec!["Breakfast", "Lunch", "Dinner"]);
    }

    #[test]
    fn untimed_event_keeps_manual_drop_position() {
        let day = fresh_day();
        create(&day, 0, "Breakfast 8am");
        create(&day, 1, "Dinner 7pm");
        let call = create(&day, 2, "Call mom");

        let moved = planner_move_event(call, 0, 0);
        assert!(moved.ok, "{}", moved.message);
        assert!(!moved.repositioned);
        assert_eq!(day_titles(&day), vec!["Call mom", "Breakfast", "Dinner"]);
    }

    #[test]
    fn set_time_and_edit_title_report_updates() {
        let day = fresh_day();
        let id = create(&day, 0, "Gym");

        let timed = planner_set_time(id.clone(), Some("06:30".to_string()), 0);
        assert!(timed.ok, "{}", timed.message);
        assert_eq!(
            timed.event.expect("event").time_iso,
            Some(format!("{day}T06:30:00Z"))
        );

        let bad = planner_set_time(id.clone(), Some("6pm".to_string()), 0);
        assert!(!bad.ok);
        assert!(bad.message.starts_with("planner_set_time failed"));

        let renamed = planner_edit_title(id.clone(), "Gym 9am".to_string(), 0);
        assert!(renamed.ok, "{}", renamed.message);
        // Already timed: the phrase stays part of the title.
        assert_eq!(renamed.event.expect("event").title, "Gym 9am");

        let cleared = planner_set_time(id, None, 0);
        assert_eq!(cleared.event.expect("event").time_iso, None);
    }

    #[test]
    fn checked_and_deleted_events() {
        let day = fresh_day();
        let id = create(&day, 0, "Laundry");

        let checked = planner_set_checked(id.clone(), true, 0);
        assert!(checked.event.expect("event").is_checked);
        let moved = planner_move_event(id.clone(), 0, 0);
        assert!(!moved.ok);

        assert!(planner_delete_event(id.clone()).ok);
        assert!(day_titles(&day).is_empty());
        assert!(!planner_delete_event(id).ok);
    }

    #[test]
    fn unchecking_reports_time_order_repair() {
        let day = fresh_day();
        create(&day, 0, "Standup 9am");
        let coffee = create(&day, 1, "Coffee");

        assert!(planner_set_checked(coffee.clone(), true, 0).ok);
        let timed = planner_set_time(coffee.clone(), Some("08:00".to_string()), 0);
        assert!(!timed.repositioned);

        let unchecked = planner_set_checked(coffee, false, 0);
        assert!(unchecked.ok, "{}", unchecked.message);
        assert!(unchecked.repositioned);
        assert_eq!(day_titles(&day), vec!["Coffee", "Standup"]);
    }

    #[test]
    fn blank_title_edit_deletes_event() {
        let day = fresh_day();
        let id = create(&day, 0, "Errands");

        let response = planner_edit_title(id.clone(), "  ".to_string(), 0);
        assert!(response.ok, "{}", response.message);
        assert!(response.event.is_none());
        assert!(day_titles(&day).is_empty());
        assert!(!planner_delete_event(id).ok);
    }

    #[test]
    fn create_next_to_untitled_event_fails() {
        let day = fresh_day();
        create(&day, 0, "");
        let response = planner_create_event(day.clone(), 1, "Walk".to_string(), 0);
        assert!(!response.ok);
        assert!(response.message.starts_with("planner_create_event failed"));
        assert_eq!(day_titles(&day), vec![""]);
    }

    #[test]
    fn listing_unseen_day_creates_no_planner_row() {
        let day = fresh_day();
        assert!(day_titles(&day).is_empty());

        let conn = open_planner_db().expect("open planner db");
        let rows: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM planners WHERE datestamp = ?1",
                [day.as_str()],
                |row| row.get(0),
            )
            .expect("count planner rows");
        assert_eq!(rows, 0);
    }

    #[test]
    fn invalid_inputs_fail_without_panicking() {
        use_test_db();
        assert!(!planner_list_day("2026-13-40".to_string(), 0).ok);
        assert!(!planner_list_day("2026-01-01".to_string(), 100_000).ok);
        assert!(!planner_move_event("not-a-uuid".to_string(), 0, 0).ok);
        assert!(!checklist_list(Some("nope".to_string())).ok);
        assert!(!checklist_create_entry(None, "box".to_string(), "x".to_string(), None, None).ok);
        assert!(
            !checklist_create_entry(
                None,
                "folder".to_string(),
                "x".to_string(),
                Some("plaid".to_string()),
                None
            )
            .ok
        );
    }

    #[test]
    fn checklist_entries_can_be_created_moved_and_deleted() {
        use_test_db();
        let folder = checklist_create_entry(
            None,
            "folder".to_string(),
            "Trips".to_string(),
            Some("indigo".to_string()),
            None,
        );
        assert!(folder.ok, "{}", folder.message);
        let folder_id = folder.entry_id.expect("folder id");

        let list = checklist_create_entry(
            Some(folder_id.clone()),
            "checklist".to_string(),
            "Packing".to_string(),
            None,
            None,
        );
        let list_id = list.entry_id.expect("checklist id");

        let socks = checklist_create_entry(
            Some(list_id.clone()),
            "item".to_string(),
            "Socks".to_string(),
            None,
            None,
        );
        assert_eq!(socks.sort_key, Some(8.0));
        let charger = checklist_create_entry(
            Some(list_id.clone()),
            "item".to_string(),
            "Charger".to_string(),
            None,
            None,
        );
        assert_eq!(charger.sort_key, Some(16.0));

        let moved = checklist_move_entry(charger.entry_id.expect("charger id"), 0);
        assert_eq!(moved.sort_key, Some(4.0));

        let items = checklist_list(Some(list_id.clone()));
        let titles: Vec<_> = items.items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Charger", "Socks"]);

        assert!(checklist_delete_entry(folder_id).ok);
        assert!(!checklist_list(Some(list_id)).ok);
    }
}
