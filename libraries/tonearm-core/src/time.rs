//! Playback time display helpers

/// Format seconds as zero-padded "MM:SS"
///
/// Negative and non-finite inputs render as "00:00".
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{:02}:{:02}", minutes, secs)
}

/// Parse an "MM:SS" label back into seconds
pub fn parse_time(label: &str) -> Option<f64> {
    let (minutes, seconds) = label.trim().split_once(':')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    Some(f64::from(minutes) * 60.0 + f64::from(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(134.2), "02:14");
        assert_eq!(format_time(3600.0), "60:00");
    }

    #[test]
    fn invalid_inputs_render_zero() {
        assert_eq!(format_time(-5.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
    }

    #[test]
    fn parses_labels() {
        assert_eq!(parse_time("02:14"), Some(134.0));
        assert_eq!(parse_time("0:05"), Some(5.0));
        assert_eq!(parse_time("1:75"), None);
        assert_eq!(parse_time("abc"), None);
        assert_eq!(parse_time(""), None);
    }
}
