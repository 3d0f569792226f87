//! Clock-time phrase extraction from free text.
//!
//! Recognizes a 12-hour time with a meridiem marker preceded by whitespace,
//! e.g. `"Dentist 9:30 pm"` or `"Standup 10am"`, and returns it as a
//! zero-padded 24-hour `HH:MM` string plus the title without the phrase.

use once_cell::sync::Lazy;
use regex::Regex;

static TIME_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+(1[0-2]|[1-9])(?::([0-5][0-9]))?\s?(AM|PM|am|pm)\b")
        .expect("valid time phrase regex")
});

/// Result of a successful time-phrase extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTime {
    /// Canonical 24-hour `HH:MM`.
    pub time_24h: String,
    /// Input text with every occurrence of the matched phrase removed.
    pub remaining_text: String,
}

/// Extracts the first clock-time phrase found in `text`.
///
/// Returns `None` when the text carries no recognizable time.
pub fn extract_time_phrase(text: &str) -> Option<ExtractedTime> {
    let captures = TIME_PHRASE_RE.captures(text)?;
    let full_match = captures.get(0)?.as_str();

    let hour: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match captures.get(2) {
        Some(value) => value.as_str().parse().ok()?,
        None => 0,
    };
    let is_pm = captures.get(3)?.as_str().eq_ignore_ascii_case("pm");

    Some(ExtractedTime {
        time_24h: format!("{:02}:{:02}", to_24_hour(hour, is_pm), minute),
        remaining_text: text.replace(full_match, ""),
    })
}

fn to_24_hour(hour: u32, is_pm: bool) -> u32 {
    match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (value, true) => value + 12,
        (value, false) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_time_phrase, ExtractedTime};

    fn extracted(time: &str, rest: &str) -> Option<ExtractedTime> {
        Some(ExtractedTime {
            time_24h: time.to_string(),
            remaining_text: rest.to_string(),
        })
    }

    #[test]
    fn trailing_time_with_minutes() {
        assert_eq!(
            extract_time_phrase("Dinner with Sam 9:30 pm"),
            extracted("21:30", "Dinner with Sam")
        );
    }

    #[test]
    fn hour_only_without_space_before_marker() {
        assert_eq!(extract_time_phrase("Standup 9am"), extracted("09:00", "Standup"));
        assert_eq!(extract_time_phrase("Gym 6 PM"), extracted("18:00", "Gym"));
    }

    #[test]
    fn noon_and_midnight() {
        assert_eq!(extract_time_phrase("Lunch 12:05 PM"), extracted("12:05", "Lunch"));
        assert_eq!(extract_time_phrase("Deploy 12 am"), extracted("00:00", "Deploy"));
    }

    #[test]
    fn phrase_in_the_middle_is_removed() {
        assert_eq!(
            extract_time_phrase("Call 10:15 AM about invoices"),
            extracted("10:15", "Call about invoices")
        );
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(
            extract_time_phrase("Flight 7 am lands 11 am"),
            extracted("07:00", "Flight lands 11 am")
        );
    }

    #[test]
    fn text_without_time_is_none() {
        assert_eq!(extract_time_phrase("Buy groceries"), None);
        assert_eq!(extract_time_phrase(""), None);
    }

    #[test]
    fn rejects_out_of_range_or_unmarked_times() {
        assert_eq!(extract_time_phrase("Room 13 pm"), None);
        assert_eq!(extract_time_phrase("Meet 9:75 pm"), None);
        assert_eq!(extract_time_phrase("Meet at 9:30"), None);
        assert_eq!(extract_time_phrase("9pm"), None);
        assert_eq!(extract_time_phrase("Team 9 amsterdam"), None);
    }
}
