//! Date and clock-time helpers shared by slots and bookings.

use chrono::{NaiveDate, NaiveTime, Utc};

use super::errors::{DomainError, DomainResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const CLOCK_FORMAT: &str = "%H:%M";

/// Current calendar date. Bookings dated before this are rejected.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn parse_booking_date(raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::Validation("Invalid date format".into()))
}

/// Parse a strict zero-padded `HH:MM` clock time.
pub fn parse_clock_time(raw: &str) -> DomainResult<NaiveTime> {
    let invalid = || DomainError::Validation(format!("Invalid time '{}', expected HH:MM", raw));
    if raw.len() != 5 {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(raw, CLOCK_FORMAT).map_err(|_| invalid())
}

/// Validate a `start_time`/`end_time` pair for a slot window.
pub fn validate_window(start: &str, end: &str) -> DomainResult<()> {
    let start_t = parse_clock_time(start)?;
    let end_t = parse_clock_time(end)?;
    if start_t >= end_t {
        return Err(DomainError::Validation(
            "start_time must be before end_time".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        let d = parse_booking_date("2099-01-01").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2099, 1, 1).unwrap());
    }

    #[test]
    fn rejects_malformed_dates() {
        for raw in ["01/01/2099", "2099-13-01", "", "tomorrow"] {
            let err = parse_booking_date(raw).unwrap_err();
            assert_eq!(err.to_string(), "Invalid date format");
        }
    }

    #[test]
    fn clock_time_must_be_zero_padded() {
        assert!(parse_clock_time("09:30").is_ok());
        assert!(parse_clock_time("23:59").is_ok());
        assert!(parse_clock_time("9:30").is_err());
        assert!(parse_clock_time("24:00").is_err());
        assert!(parse_clock_time("12:60").is_err());
    }

    #[test]
    fn window_requires_start_before_end() {
        assert!(validate_window("08:00", "09:00").is_ok());
        assert!(validate_window("09:00", "09:00").is_err());
        assert!(validate_window("10:00", "09:00").is_err());
    }
}
