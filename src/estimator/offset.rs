use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::{EstimatorError, Result};

/// Calendar units an offset can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl DurationUnit {
    /// Length in seconds for fixed-length units; `None` for months and years.
    pub fn fixed_secs(self) -> Option<i64> {
        match self {
            DurationUnit::Seconds => Some(1),
            DurationUnit::Minutes => Some(60),
            DurationUnit::Hours => Some(3_600),
            DurationUnit::Days => Some(86_400),
            DurationUnit::Weeks => Some(604_800),
            DurationUnit::Months | DurationUnit::Years => None,
        }
    }
}

impl FromStr for DurationUnit {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        // "M" is months, "m" is minutes
        if s == "M" {
            return Ok(DurationUnit::Months);
        }
        let unit = match s.to_ascii_lowercase().as_str() {
            "second" | "seconds" | "sec" | "secs" | "s" => DurationUnit::Seconds,
            "minute" | "minutes" | "min" | "mins" | "m" => DurationUnit::Minutes,
            "hour" | "hours" | "h" => DurationUnit::Hours,
            "day" | "days" | "d" => DurationUnit::Days,
            "week" | "weeks" | "w" => DurationUnit::Weeks,
            "month" | "months" => DurationUnit::Months,
            "year" | "years" | "y" => DurationUnit::Years,
            _ => {
                return Err(EstimatorError::InvalidOffset(format!(
                    "unknown time unit '{s}'"
                )));
            }
        };
        Ok(unit)
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DurationUnit::Seconds => "seconds",
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
            DurationUnit::Weeks => "weeks",
            DurationUnit::Months => "months",
            DurationUnit::Years => "years",
        };
        f.write_str(name)
    }
}

/// Distance from the reference block, either in whole blocks or in wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Blocks(u64),
    Duration { amount: u64, unit: DurationUnit },
}

impl Offset {
    pub fn blocks(count: u64) -> Self {
        Offset::Blocks(count)
    }

    pub fn duration(amount: u64, unit: DurationUnit) -> Self {
        Offset::Duration { amount, unit }
    }

    /// Build an offset from an amount and a unit name. `block`/`blocks` select a
    /// block count; anything else must name a calendar unit.
    pub fn parse(amount: u64, unit: &str) -> Result<Self> {
        match unit.trim().to_ascii_lowercase().as_str() {
            "block" | "blocks" => Ok(Offset::Blocks(amount)),
            _ => Ok(Offset::Duration {
                amount,
                unit: unit.parse()?,
            }),
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Blocks(n) => write!(f, "{n} blocks"),
            Offset::Duration { amount, unit } => write!(f, "{amount} {unit}"),
        }
    }
}

/// Result of moving away from the reference block.
///
/// Block offsets resolve to a point in time; duration offsets resolve to a block number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimate {
    Block(u64),
    Timestamp(DateTime<Utc>),
}

impl Estimate {
    pub fn block(self) -> Option<u64> {
        match self {
            Estimate::Block(number) => Some(number),
            Estimate::Timestamp(_) => None,
        }
    }

    pub fn timestamp(self) -> Option<DateTime<Utc>> {
        match self {
            Estimate::Timestamp(ts) => Some(ts),
            Estimate::Block(_) => None,
        }
    }
}
