//! Core domain logic for the daily planner.
//!
//! Ordering lives in [`order`]: fractional sort keys for manual placement
//! and a chronological pass that keeps timed events in time order.
//! Everything else (storage, services, text parsing) feeds that core.

pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod order;
pub mod repo;
pub mod service;
pub mod text;

pub use context::PlannerContext;
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::checklist::{ChecklistColor, ChecklistItem, ChecklistItemKind};
pub use model::list_item::{ListItem, ListItemId};
pub use model::planner::Planner;
pub use model::planner_event::{CalendarConfig, MultiDayConfig, PlannerEvent, TimeConfig};
pub use model::validation::ModelValidationError;
pub use order::{
    compute_insertion_key, compute_reconciled_key, is_time_less_or_equal, OrderableItem,
    DEFAULT_SORT_KEY,
};
pub use repo::checklist_repo::{ChecklistRepository, SqliteChecklistRepository};
pub use repo::planner_repo::{PlannerEventRepository, SqlitePlannerRepository};
pub use repo::{RepoError, RepoResult};
pub use service::checklist_service::{ChecklistDraft, ChecklistService, ChecklistServiceError};
pub use service::planner_service::{
    EventUpdate, MoveOutcome, PlannerService, PlannerServiceError,
};
pub use text::time_phrase::{extract_time_phrase, ExtractedTime};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
