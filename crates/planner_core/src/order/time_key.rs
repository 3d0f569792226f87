//! Time-of-day comparison on canonical strings.

/// Returns whether time `a` is earlier than or equal to time `b`.
///
/// Comparison is lexicographic. This matches chronological order only when
/// both strings share one canonical format (zero-padded 24-hour `HH:MM`, or
/// fixed-width UTC ISO 8601); callers normalize before comparing.
pub fn is_time_less_or_equal(a: &str, b: &str) -> bool {
    a <= b
}
