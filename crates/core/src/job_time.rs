//! Job-time (shift log) rules: range validation and worked-hours arithmetic.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Longest shift a single entry may span.
pub const MAX_SHIFT_MINUTES: i64 = 24 * 60;

/// Validate a shift's start/end/break triple.
///
/// The end must be strictly after the start, the shift may not exceed
/// [`MAX_SHIFT_MINUTES`], and the break must be non-negative and shorter
/// than the shift itself.
pub fn validate_shift(
    start: Timestamp,
    end: Timestamp,
    break_minutes: i32,
) -> Result<(), CoreError> {
    if end <= start {
        return Err(CoreError::Validation(
            "End time must be after start time".into(),
        ));
    }

    let span = (end - start).num_minutes();
    if span > MAX_SHIFT_MINUTES {
        return Err(CoreError::Validation(format!(
            "A single entry cannot exceed {} hours",
            MAX_SHIFT_MINUTES / 60
        )));
    }

    if break_minutes < 0 {
        return Err(CoreError::Validation(
            "Break minutes cannot be negative".into(),
        ));
    }

    if i64::from(break_minutes) >= span {
        return Err(CoreError::Validation(
            "Break must be shorter than the shift".into(),
        ));
    }

    Ok(())
}

/// Minutes actually worked: shift span minus the break, floored at zero.
pub fn worked_minutes(start: Timestamp, end: Timestamp, break_minutes: i32) -> i64 {
    ((end - start).num_minutes() - i64::from(break_minutes)).max(0)
}

/// Convert minutes to hours rounded to two decimal places.
pub fn minutes_to_hours(minutes: i64) -> f64 {
    (minutes as f64 / 60.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn at(hour: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
    }

    #[test]
    fn accepts_normal_shift() {
        assert!(validate_shift(at(9, 0), at(17, 0), 30).is_ok());
    }

    #[test]
    fn rejects_end_before_or_equal_start() {
        assert!(validate_shift(at(9, 0), at(9, 0), 0).is_err());
        assert!(validate_shift(at(17, 0), at(9, 0), 0).is_err());
    }

    #[test]
    fn rejects_overlong_shift() {
        let start = at(8, 0);
        let end = start + Duration::minutes(MAX_SHIFT_MINUTES + 1);
        assert!(validate_shift(start, end, 0).is_err());

        let end = start + Duration::minutes(MAX_SHIFT_MINUTES);
        assert!(validate_shift(start, end, 0).is_ok());
    }

    #[test]
    fn rejects_bad_breaks() {
        assert!(validate_shift(at(9, 0), at(10, 0), -5).is_err());
        assert!(validate_shift(at(9, 0), at(10, 0), 60).is_err());
        assert!(validate_shift(at(9, 0), at(10, 0), 59).is_ok());
    }

    #[test]
    fn worked_minutes_subtracts_break() {
        assert_eq!(worked_minutes(at(9, 0), at(17, 0), 30), 450);
        assert_eq!(worked_minutes(at(9, 0), at(9, 10), 30), 0);
    }

    #[test]
    fn hours_round_to_two_decimals() {
        assert_eq!(minutes_to_hours(450), 7.5);
        assert_eq!(minutes_to_hours(20), 0.33);
        assert_eq!(minutes_to_hours(0), 0.0);
    }
}
