//! Record-level validation shared by every model type.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATESTAMP_FORMAT: &str = "%Y-%m-%d";
const CANONICAL_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Validation errors for model invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValidationError {
    /// Item id must not be nil.
    NilId,
    /// Sort key must be a finite number.
    NonFiniteSortKey(f64),
    /// Datestamp must be `YYYY-MM-DD`.
    InvalidDatestamp(String),
    /// Instant must be canonical UTC ISO (`YYYY-MM-DDTHH:MM:SSZ`).
    InvalidIsoInstant(String),
    /// Calendar end must not be earlier than start.
    CalendarEndBeforeStart { start: String, end: String },
    /// A checklist entry cannot be its own parent.
    SelfParent,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "item id must not be nil"),
            Self::NonFiniteSortKey(value) => write!(f, "sort_key must be finite, got {value}"),
            Self::InvalidDatestamp(value) => {
                write!(f, "datestamp must be YYYY-MM-DD, got `{value}`")
            }
            Self::InvalidIsoInstant(value) => write!(
                f,
                "instant must be canonical UTC ISO (YYYY-MM-DDTHH:MM:SSZ), got `{value}`"
            ),
            Self::CalendarEndBeforeStart { start, end } => {
                write!(f, "end_iso ({end}) must be >= start_iso ({start})")
            }
            Self::SelfParent => write!(f, "checklist entry cannot be its own parent"),
        }
    }
}

impl Error for ModelValidationError {}

/// Parses a strict `YYYY-MM-DD` datestamp.
pub fn parse_datestamp(value: &str) -> Result<NaiveDate, ModelValidationError> {
    NaiveDate::parse_from_str(value, DATESTAMP_FORMAT)
        .ok()
        .filter(|date| date.format(DATESTAMP_FORMAT).to_string() == value)
        .ok_or_else(|| ModelValidationError::InvalidDatestamp(value.to_string()))
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_datestamp(date: NaiveDate) -> String {
    date.format(DATESTAMP_FORMAT).to_string()
}

/// Normalizes any RFC 3339 instant into canonical UTC ISO form.
///
/// Canonical strings are fixed width, so lexicographic order is
/// chronological order.
pub fn canonical_utc_iso(value: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|instant| format_canonical_iso(instant.naive_utc()))
}

/// Formats a UTC date-time as canonical ISO (`YYYY-MM-DDTHH:MM:SSZ`).
pub fn format_canonical_iso(utc: NaiveDateTime) -> String {
    utc.format(CANONICAL_ISO_FORMAT).to_string()
}

/// Validates that `value` is already in canonical UTC ISO form.
pub fn ensure_canonical_iso(value: &str) -> Result<(), ModelValidationError> {
    match canonical_utc_iso(value) {
        Some(canonical) if canonical == value => Ok(()),
        _ => Err(ModelValidationError::InvalidIsoInstant(value.to_string())),
    }
}

pub(crate) fn ensure_finite_sort_key(sort_key: f64) -> Result<(), ModelValidationError> {
    if sort_key.is_finite() {
        Ok(())
    } else {
        Err(ModelValidationError::NonFiniteSortKey(sort_key))
    }
}
