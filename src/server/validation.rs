use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::server::response::ApiError;
use crate::types::DriveStatus;

/// Requires a mandatory field to be present and non-empty. The message names
/// every mandatory field of the endpoint, matching the combined check the
/// clients expect.
pub fn require_field(value: Option<String>, message: &'static str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(message)),
    }
}

/// Parses a date input as RFC 3339, or as a bare `YYYY-MM-DD` taken as
/// midnight UTC.
pub fn parse_date_input(raw: &str, field: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        })
        .ok_or_else(|| ApiError::bad_request(format!("Invalid {field}")))
}

pub fn parse_drive_status(raw: &str) -> Result<DriveStatus, ApiError> {
    DriveStatus::parse(raw)
        .ok_or_else(|| ApiError::bad_request("Status must be \"gform\" or \"round\""))
}

pub fn non_negative(value: i64, field: &str) -> Result<i64, ApiError> {
    if value < 0 {
        return Err(ApiError::bad_request(format!("{field} cannot be negative")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_bare_dates_as_midnight_utc() {
        let parsed = parse_date_input("2026-03-15", "tentative date").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let parsed = parse_date_input("2026-03-15T09:30:00+05:30", "deadline").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 15, 4, 0, 0).unwrap());
    }

    #[test]
    fn rejects_unparseable_dates() {
        assert!(parse_date_input("next friday", "tentative date").is_err());
        assert!(parse_date_input("", "tentative date").is_err());
    }

    #[test]
    fn require_field_rejects_missing_and_empty() {
        assert!(require_field(None, "Name is required").is_err());
        assert!(require_field(Some(String::new()), "Name is required").is_err());
        assert_eq!(
            require_field(Some("Google India".to_string()), "Name is required").unwrap(),
            "Google India"
        );
    }

    #[test]
    fn status_must_be_enumerated() {
        assert!(parse_drive_status("gform").is_ok());
        assert!(parse_drive_status("round").is_ok());
        assert!(parse_drive_status("paused").is_err());
    }
}
