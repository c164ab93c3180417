//! Display formatting for durations shown in status output.

/// Format milliseconds as `M:SS.mmm`.
pub fn format_duration_ms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}.{:03}", secs / 60, secs % 60, ms % 1000)
}

/// Format an optional cap, where 0 means "none".
pub fn format_cap_ms(ms: u64) -> String {
    if ms == 0 {
        "none".to_string()
    } else {
        format_duration_ms(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(0), "0:00.000");
        assert_eq!(format_duration_ms(1_200), "0:01.200");
        assert_eq!(format_duration_ms(65_005), "1:05.005");
    }

    #[test]
    fn test_format_cap_ms() {
        assert_eq!(format_cap_ms(0), "none");
        assert_eq!(format_cap_ms(5_000), "0:05.000");
    }
}
