//! Flutter bridge for the planner core.

pub mod api;
