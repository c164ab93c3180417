//! ISO-8601 instant parsing.
//!
//! Stored records come from several writers, so a handful of encodings are
//! accepted: fractional or whole seconds, with a numeric offset or a `Z`.
//! When no offset-aware pattern matches, the text is read as a naive UTC
//! timestamp. `None` is the "invalid" result.

use chrono::{DateTime, NaiveDateTime, Utc};

const OFFSET_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

const NAIVE_PATTERNS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

/// Parse an instant, returning `None` when no supported encoding matches.
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let normalized = match text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
        Some(body) => format!("{body}+00:00"),
        None => text.to_string(),
    };

    for pattern in OFFSET_PATTERNS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, pattern) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    let naive = strip_offset(&normalized);
    NAIVE_PATTERNS.iter().find_map(|pattern| {
        NaiveDateTime::parse_from_str(naive, pattern)
            .ok()
            .map(|dt| dt.and_utc())
    })
}

/// Drop a trailing `±HH:MM` offset, if present.
fn strip_offset(text: &str) -> &str {
    let Some(split) = text.len().checked_sub(6) else {
        return text;
    };
    if !text.is_char_boundary(split) {
        return text;
    }

    let tail = text[split..].as_bytes();
    let is_offset = matches!(tail[0], b'+' | b'-')
        && tail[1].is_ascii_digit()
        && tail[2].is_ascii_digit()
        && tail[3] == b':'
        && tail[4].is_ascii_digit()
        && tail[5].is_ascii_digit();

    if is_offset { &text[..split] } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(text: &str) -> Option<i64> {
        parse_instant(text).map(|dt| dt.timestamp_millis())
    }

    #[test]
    fn test_encodings_agree_on_the_same_instant() {
        let expected = millis("2025-05-01T12:00:00.000+00:00").unwrap();
        assert_eq!(millis("2025-05-01T12:00:00Z"), Some(expected));
        assert_eq!(millis("2025-05-01T12:00:00.000Z"), Some(expected));
        assert_eq!(millis("2025-05-01T14:00:00+02:00"), Some(expected));
        assert_eq!(millis("2025-05-01T07:30:00.000-04:30"), Some(expected));
        assert_eq!(millis("2025-05-01T12:00:00+0000"), Some(expected));
    }

    #[test]
    fn test_fractional_seconds_are_kept() {
        let whole = millis("2025-05-01T12:00:00Z").unwrap();
        assert_eq!(millis("2025-05-01T12:00:00.250Z"), Some(whole + 250));
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        assert_eq!(
            millis("2025-05-01T12:00:00"),
            millis("2025-05-01T12:00:00Z")
        );
        assert_eq!(
            millis("2025-05-01T12:00:00.500"),
            millis("2025-05-01T12:00:00.500Z")
        );
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(parse_instant(""), None);
        assert_eq!(parse_instant("   "), None);
        assert_eq!(parse_instant("yesterday"), None);
        assert_eq!(parse_instant("2025-13-01T00:00:00Z"), None);
        assert_eq!(parse_instant("2025-05-01"), None);
    }

    #[test]
    fn test_strip_offset() {
        assert_eq!(strip_offset("2025-05-01T12:00:00+02:00"), "2025-05-01T12:00:00");
        assert_eq!(strip_offset("2025-05-01T12:00:00"), "2025-05-01T12:00:00");
        assert_eq!(strip_offset("short"), "short");
        assert_eq!(strip_offset("ééé"), "ééé");
    }
}
