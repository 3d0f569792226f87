//! Explicit planner context.
//!
//! # Responsibility
//! - Carry "today" and the local UTC offset into services as plain values.
//! - Convert between local clock times and canonical UTC instants.
//!
//! # Invariants
//! - Core never reads the wall clock on its own; callers build a context
//!   (only the `now_*` constructors touch the host clock).
//! - Produced instants are canonical UTC ISO strings.

use crate::model::validation::{format_canonical_iso, format_datestamp, parse_datestamp};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Utc};

const CLOCK_TIME_FORMAT: &str = "%H:%M";

/// "Today" and local offset used by planner use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerContext {
    today: NaiveDate,
    utc_offset: FixedOffset,
}

impl PlannerContext {
    pub fn new(today: NaiveDate, utc_offset: FixedOffset) -> Self {
        Self { today, utc_offset }
    }

    /// Builds a context from an offset in minutes east of UTC.
    ///
    /// Returns `None` when the offset is out of range (more than ±24h).
    pub fn from_offset_minutes(today: NaiveDate, offset_minutes: i32) -> Option<Self> {
        let utc_offset = FixedOffset::east_opt(offset_minutes.checked_mul(60)?)?;
        Some(Self::new(today, utc_offset))
    }

    /// Builds a context from the host clock and local time zone.
    pub fn now_local() -> Self {
        let now = Local::now();
        Self::new(now.date_naive(), *now.offset())
    }

    /// Builds a context from the host clock seen at a caller-supplied
    /// offset. Bridges use this because the UI owns the time zone.
    pub fn now_with_offset_minutes(offset_minutes: i32) -> Option<Self> {
        let utc_offset = FixedOffset::east_opt(offset_minutes.checked_mul(60)?)?;
        let today = Utc::now().with_timezone(&utc_offset).date_naive();
        Some(Self::new(today, utc_offset))
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Returns today's `YYYY-MM-DD`.
    pub fn today_datestamp(&self) -> String {
        format_datestamp(self.today)
    }

    /// Converts a local `HH:MM` on `datestamp` to a canonical UTC instant.
    ///
    /// Returns `None` for malformed input.
    pub fn local_time_to_utc_iso(&self, datestamp: &str, time_24h: &str) -> Option<String> {
        let date = parse_datestamp(datestamp).ok()?;
        let time = NaiveTime::parse_from_str(time_24h, CLOCK_TIME_FORMAT).ok()?;
        let local = self
            .utc_offset
            .from_local_datetime(&date.and_time(time))
            .single()?;
        Some(format_canonical_iso(local.naive_utc()))
    }

    /// Returns the local 12-hour display pair for an instant, e.g.
    /// `("9:30", "PM")`.
    pub fn clock_label(&self, iso: &str) -> Option<(String, String)> {
        let local = DateTime::parse_from_rfc3339(iso)
            .ok()?
            .with_timezone(&self.utc_offset);
        Some((
            local.format("%-I:%M").to_string(),
            local.format("%p").to_string(),
        ))
    }
}
