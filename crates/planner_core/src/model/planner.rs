//! One calendar day's planner.

use super::validation::{parse_datestamp, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Day container; deleting it removes every event of that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planner {
    /// Unique `YYYY-MM-DD` key.
    pub datestamp: String,
}

impl Planner {
    /// Creates a planner after validating the datestamp.
    pub fn new(datestamp: impl Into<String>) -> Result<Self, ModelValidationError> {
        let datestamp = datestamp.into();
        parse_datestamp(&datestamp)?;
        Ok(Self { datestamp })
    }
}
