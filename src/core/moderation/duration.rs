// Duration strings for timeout commands ("10s", "5m", "2h", "1d", "1w").

/// Discord caps timeouts at 28 days.
pub const MAX_TIMEOUT_SECS: u64 = 28 * 24 * 3600;

/// Parse a leading number and optional unit into seconds.
///
/// A missing unit means seconds. Returns `None` for unknown units or input
/// without a leading number.
pub fn parse_duration_secs(input: &str) -> Option<u64> {
    let input = input.trim().to_lowercase();
    let digits_end = input
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(input.len());

    if digits_end == 0 {
        return None;
    }

    let number: u64 = input[..digits_end].parse().ok()?;
    let unit = input[digits_end..].trim();

    let multiplier = match unit {
        "" | "s" | "sec" | "second" | "seconds" => 1,
        "m" | "min" | "minute" | "minutes" => 60,
        "h" | "hr" | "hour" | "hours" => 3600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 604_800,
        _ => return None,
    };

    number.checked_mul(multiplier)
}

/// "1 second", "5 minutes", "2 hours", "3 days".
pub fn format_duration(seconds: u64) -> String {
    let (value, unit) = if seconds < 60 {
        (seconds, "second")
    } else if seconds < 3600 {
        (seconds / 60, "minute")
    } else if seconds < 86_400 {
        (seconds / 3600, "hour")
    } else {
        (seconds / 86_400, "day")
    };

    format!("{} {}{}", value, unit, if value == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_duration_secs("30"), Some(30));
        assert_eq!(parse_duration_secs("30s"), Some(30));
        assert_eq!(parse_duration_secs("10m"), Some(600));
        assert_eq!(parse_duration_secs("2h"), Some(7200));
        assert_eq!(parse_duration_secs("1d"), Some(86_400));
        assert_eq!(parse_duration_secs("1w"), Some(604_800));
        assert_eq!(parse_duration_secs(" 5 Minutes "), Some(300));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_duration_secs(""), None);
        assert_eq!(parse_duration_secs("m10"), None);
        assert_eq!(parse_duration_secs("10y"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_duration(1), "1 second");
        assert_eq!(format_duration(59), "59 seconds");
        assert_eq!(format_duration(600), "10 minutes");
        assert_eq!(format_duration(3600), "1 hour");
        assert_eq!(format_duration(MAX_TIMEOUT_SECS), "28 days");
    }
}
