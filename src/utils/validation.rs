use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

/// Formats accepted from a `datetime-local` style input
const LOCAL_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Format written back into the edit form
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse a local wall-clock datetime (e.g. "2024-05-01T14:30") into an absolute instant.
///
/// Blank input means "no expiration given" and yields `None`. A fully qualified
/// RFC 3339 timestamp is also accepted as-is.
pub fn parse_local_datetime<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<Option<DateTime<Utc>>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if let Ok(absolute) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(absolute.with_timezone(&Utc)));
    }

    let naive = LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| anyhow!("Invalid expiration date: {}", input))?;

    // Ambiguous wall-clock times (DST fall-back) resolve to the earlier instant
    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("Expiration date does not exist in local time: {}", input))?;

    Ok(Some(local.with_timezone(&Utc)))
}

/// Render an instant the way the edit form expects it.
pub fn format_local_datetime<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    instant
        .with_timezone(tz)
        .format(LOCAL_DATETIME_FORMAT)
        .to_string()
}

/// Parse the max-views field. Blank means "no limit" and yields `None`.
pub fn parse_max_views(input: &str) -> Result<Option<u32>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let views: u32 = input
        .parse()
        .map_err(|_| anyhow!("Max views must be a whole number: {}", input))?;

    if views == 0 {
        return Err(anyhow!("Max views must be at least 1"));
    }

    Ok(Some(views))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_blank_expiration_is_none() {
        assert_eq!(parse_local_datetime("", &Utc).unwrap(), None);
        assert_eq!(parse_local_datetime("   ", &Utc).unwrap(), None);
    }

    #[test]
    fn test_local_datetime_uses_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let parsed = parse_local_datetime("2024-05-01T14:30", &tz).unwrap().unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_passes_through() {
        let parsed = parse_local_datetime("2024-05-01T14:30:00+00:00", &FixedOffset::east_opt(3600).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_invalid_datetime_rejected() {
        assert!(parse_local_datetime("tomorrow", &Utc).is_err());
    }

    #[test]
    fn test_format_round_trips_through_form() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 12, 31, 23, 15, 0).unwrap();
        let text = format_local_datetime(&instant, &tz);
        assert_eq!(text, "2024-12-31T18:15");
        assert_eq!(parse_local_datetime(&text, &tz).unwrap(), Some(instant));
    }

    #[test]
    fn test_max_views() {
        assert_eq!(parse_max_views("").unwrap(), None);
        assert_eq!(parse_max_views(" 12 ").unwrap(), Some(12));
        assert!(parse_max_views("0").is_err());
        assert!(parse_max_views("-3").is_err());
        assert!(parse_max_views("ten").is_err());
    }
}
