//! Calendar arithmetic on UNIX timestamps.
//!
//! Fixed-length units shift by an exact number of seconds. Months and years
//! follow the calendar, clamping to the last day of shorter months.

use chrono::{DateTime, Months, TimeDelta, Utc};

use super::error::{EstimatorError, Result};
use super::offset::DurationUnit;

pub fn to_datetime(timestamp: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0).ok_or(EstimatorError::TimestampOutOfRange)
}

/// `timestamp` moved forward by `amount` `unit`s.
pub fn add(timestamp: i64, amount: u64, unit: DurationUnit) -> Result<i64> {
    let start = to_datetime(timestamp)?;
    let shifted = match unit.fixed_secs() {
        Some(unit_secs) => start.checked_add_signed(fixed_delta(amount, unit_secs)?),
        None => start.checked_add_months(calendar_months(amount, unit)?),
    };
    shifted
        .map(|dt| dt.timestamp())
        .ok_or(EstimatorError::TimestampOutOfRange)
}

/// `timestamp` moved backward by `amount` `unit`s.
pub fn subtract(timestamp: i64, amount: u64, unit: DurationUnit) -> Result<i64> {
    let start = to_datetime(timestamp)?;
    let shifted = match unit.fixed_secs() {
        Some(unit_secs) => start.checked_sub_signed(fixed_delta(amount, unit_secs)?),
        None => start.checked_sub_months(calendar_months(amount, unit)?),
    };
    shifted
        .map(|dt| dt.timestamp())
        .ok_or(EstimatorError::TimestampOutOfRange)
}

fn fixed_delta(amount: u64, unit_secs: i64) -> Result<TimeDelta> {
    i64::try_from(amount)
        .ok()
        .and_then(|amount| amount.checked_mul(unit_secs))
        .and_then(TimeDelta::try_seconds)
        .ok_or(EstimatorError::TimestampOutOfRange)
}

fn calendar_months(amount: u64, unit: DurationUnit) -> Result<Months> {
    let months = match unit {
        DurationUnit::Years => amount.checked_mul(12),
        _ => Some(amount),
    };
    months
        .and_then(|months| u32::try_from(months).ok())
        .map(Months::new)
        .ok_or(EstimatorError::TimestampOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap().timestamp()
    }

    #[test]
    fn fixed_units_shift_exact_seconds() {
        let t = 1_700_000_000;
        assert_eq!(subtract(t, 90, DurationUnit::Seconds).unwrap(), t - 90);
        assert_eq!(subtract(t, 30, DurationUnit::Minutes).unwrap(), t - 1_800);
        assert_eq!(add(t, 2, DurationUnit::Hours).unwrap(), t + 7_200);
        assert_eq!(add(t, 1, DurationUnit::Days).unwrap(), t + 86_400);
        assert_eq!(subtract(t, 1, DurationUnit::Weeks).unwrap(), t - 604_800);
    }

    #[test]
    fn months_follow_the_calendar() {
        let mar_31 = ts(2024, 3, 31, 12, 0, 0);
        assert_eq!(
            subtract(mar_31, 1, DurationUnit::Months).unwrap(),
            ts(2024, 2, 29, 12, 0, 0)
        );
        assert_eq!(
            add(mar_31, 1, DurationUnit::Months).unwrap(),
            ts(2024, 4, 30, 12, 0, 0)
        );
    }

    #[test]
    fn years_are_twelve_months() {
        let leap_day = ts(2024, 2, 29, 0, 0, 0);
        assert_eq!(
            add(leap_day, 1, DurationUnit::Years).unwrap(),
            ts(2025, 2, 28, 0, 0, 0)
        );
        assert_eq!(
            subtract(ts(2024, 6, 1, 0, 0, 0), 2, DurationUnit::Years).unwrap(),
            ts(2022, 6, 1, 0, 0, 0)
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert!(matches!(
            add(0, u64::MAX, DurationUnit::Seconds),
            Err(EstimatorError::TimestampOutOfRange)
        ));
        assert!(matches!(
            subtract(0, u64::MAX, DurationUnit::Years),
            Err(EstimatorError::TimestampOutOfRange)
        ));
    }
}
