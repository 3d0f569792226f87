//! Free-text helpers feeding the ordering core.
//!
//! # Responsibility
//! - Pull a clock-time phrase out of a user-typed title.
//!
//! # Invariants
//! - Extraction is pure; "no match" is `None`, never an error.

pub mod time_phrase;
