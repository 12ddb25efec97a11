use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::AppError;

pub const PLACEHOLDER: &str = "—";

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{1,2}):(\d{2})$|^(\d+)s?$").expect("duration pattern is valid")
});

#[must_use]
pub fn or_placeholder(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[must_use]
pub fn format_distance(meters: Option<f64>) -> String {
    or_placeholder(meters.map(|m| format!("{:.2} km", m / 1000.0)))
}

#[must_use]
pub fn format_elevation(meters: Option<f64>) -> String {
    or_placeholder(meters.map(|m| format!("{m:.0} m")))
}

#[must_use]
pub fn format_duration(seconds: Option<u32>) -> String {
    or_placeholder(seconds.map(duration_string))
}

#[must_use]
pub fn format_pace(seconds_per_km: Option<f64>) -> String {
    or_placeholder(
        seconds_per_km
            .filter(|p| p.is_finite() && *p >= 0.0)
            .map(|p| format!("{} /km", duration_string(p.round() as u32))),
    )
}

#[must_use]
pub fn format_date(date: Option<NaiveDate>) -> String {
    or_placeholder(date.map(|d| d.format("%Y-%m-%d").to_string()))
}

#[must_use]
pub fn format_count(count: Option<u32>) -> String {
    or_placeholder(count.map(|c| c.to_string()))
}

fn duration_string(total: u32) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Parses `"h:mm:ss"`, `"m:ss"` or a bare number of seconds.
///
/// # Errors
///
/// Will return `Err` if the text matches none of those forms, the seconds
/// field is 60 or more, or the total does not fit in a `u32`.
pub fn parse_duration(text: &str) -> Result<u32, AppError> {
    let text = text.trim();
    let caps = DURATION_RE
        .captures(text)
        .ok_or_else(|| AppError::Invalid(format!("'{text}' is not a time like 5:23 or 1:02:03")))?;

    let num = |idx: usize| -> Result<u32, AppError> {
        caps.get(idx)
            .map_or(Ok(0), |m| m.as_str().parse::<u32>())
            .map_err(|e| AppError::Invalid(format!("'{text}': {e}")))
    };

    if caps.get(4).is_some() {
        return num(4);
    }

    let (hours, minutes, seconds) = (num(1)?, num(2)?, num(3)?);
    if seconds >= 60 || (caps.get(1).is_some() && minutes >= 60) {
        return Err(AppError::Invalid(format!("'{text}' has a field out of range")));
    }
    hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .ok_or_else(|| AppError::Invalid(format!("'{text}' is too long a time")))
}

static STRAVA_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"strava\.com/segments/(\d+)").expect("segment url pattern is valid")
});

/// Segment id from a `https://www.strava.com/segments/{id}` link.
#[must_use]
pub fn strava_id_from_url(url: &str) -> Option<i64> {
    STRAVA_SEGMENT_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Empty form fields mean "not set".
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_render_placeholder() {
        assert_eq!(format_distance(None), PLACEHOLDER);
        assert_eq!(format_duration(None), PLACEHOLDER);
        assert_eq!(format_pace(None), PLACEHOLDER);
        assert_eq!(format_date(None), PLACEHOLDER);
        assert_eq!(or_placeholder(Some("  ".into())), PLACEHOLDER);
    }

    #[test]
    fn formats_present_values() {
        assert_eq!(format_distance(Some(1234.0)), "1.23 km");
        assert_eq!(format_elevation(Some(87.6)), "88 m");
        assert_eq!(format_duration(Some(323)), "5:23");
        assert_eq!(format_duration(Some(3723)), "1:02:03");
        assert_eq!(format_pace(Some(299.6)), "5:00 /km");
    }

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration("5:23").unwrap(), 323);
        assert_eq!(parse_duration("1:02:03").unwrap(), 3723);
        assert_eq!(parse_duration(" 45 ").unwrap(), 45);
        assert_eq!(parse_duration("45s").unwrap(), 45);
        assert!(parse_duration("5:75").is_err());
        assert!(parse_duration("1:75:00").is_err());
        assert!(parse_duration("fast").is_err());
    }

    #[test]
    fn huge_hours_are_rejected_not_wrapped() {
        assert!(matches!(
            parse_duration("2000000:00:00"),
            Err(AppError::Invalid(_))
        ));
        assert!(matches!(
            parse_duration("99999999999:00:00"),
            Err(AppError::Invalid(_))
        ));
        assert_eq!(parse_duration("1193046:28:15").unwrap(), u32::MAX);
    }

    #[test]
    fn reads_segment_id_from_link() {
        assert_eq!(
            strava_id_from_url("https://www.strava.com/segments/229781?filter=overall"),
            Some(229_781)
        );
        assert_eq!(strava_id_from_url("https://example.com/229781"), None);
    }
}
