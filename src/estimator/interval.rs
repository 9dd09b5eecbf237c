use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{EstimatorError, Result};

/// Default nominal block interval, in seconds.
pub const DEFAULT_BLOCK_INTERVAL_SECS: f64 = 3.0;

/// Default cap on provider queries issued by one correction run.
pub const DEFAULT_MAX_CORRECTION_STEPS: usize = 64;

/// Units accepted when configuring the nominal block interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Seconds,
    Minutes,
    Hours,
}

impl IntervalUnit {
    pub fn seconds(self) -> f64 {
        match self {
            IntervalUnit::Seconds => 1.0,
            IntervalUnit::Minutes => 60.0,
            IntervalUnit::Hours => 3600.0,
        }
    }
}

impl FromStr for IntervalUnit {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => Ok(IntervalUnit::Seconds),
            "minutes" | "minute" | "mins" | "min" | "m" => Ok(IntervalUnit::Minutes),
            "hours" | "hour" | "h" => Ok(IntervalUnit::Hours),
            other => Err(EstimatorError::InvalidConfiguration(format!(
                "unrecognized block interval unit '{other}'"
            ))),
        }
    }
}

/// Raw `{ value, unit }` pair as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockIntervalConfig {
    pub value: f64,
    pub unit: String,
}

impl Default for BlockIntervalConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_BLOCK_INTERVAL_SECS,
            unit: "seconds".to_string(),
        }
    }
}

/// Assumed average time between consecutive blocks. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct NominalInterval(f64);

impl NominalInterval {
    pub fn from_secs(secs: f64) -> Result<Self> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(EstimatorError::InvalidConfiguration(format!(
                "block interval must be a positive number of seconds, got {secs}"
            )));
        }
        Ok(Self(secs))
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0
    }
}

impl Default for NominalInterval {
    fn default() -> Self {
        Self(DEFAULT_BLOCK_INTERVAL_SECS)
    }
}

impl TryFrom<&BlockIntervalConfig> for NominalInterval {
    type Error = EstimatorError;

    fn try_from(config: &BlockIntervalConfig) -> Result<Self> {
        let unit: IntervalUnit = config.unit.parse()?;
        Self::from_secs(config.value * unit.seconds())
    }
}

impl fmt::Display for NominalInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Everything needed to build an estimator besides its provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub block_interval: BlockIntervalConfig,
    pub max_correction_steps: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            block_interval: BlockIntervalConfig::default(),
            max_correction_steps: DEFAULT_MAX_CORRECTION_STEPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(value: f64, unit: &str) -> Result<NominalInterval> {
        NominalInterval::try_from(&BlockIntervalConfig {
            value,
            unit: unit.into(),
        })
    }

    #[test]
    fn converts_units_to_seconds() {
        assert_eq!(interval(3.0, "seconds").unwrap().as_secs_f64(), 3.0);
        assert_eq!(interval(2.0, "minutes").unwrap().as_secs_f64(), 120.0);
        assert_eq!(interval(1.0, "hours").unwrap().as_secs_f64(), 3600.0);
        assert_eq!(interval(0.5, "s").unwrap().as_secs_f64(), 0.5);
    }

    #[test]
    fn default_is_three_seconds() {
        let from_config = NominalInterval::try_from(&BlockIntervalConfig::default()).unwrap();
        assert_eq!(from_config, NominalInterval::default());
        assert_eq!(from_config.as_secs_f64(), 3.0);
    }

    #[test]
    fn rejects_unknown_unit() {
        let err = interval(3.0, "fortnights").unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidConfiguration(_)));
    }

    #[test]
    fn rejects_non_positive_values() {
        assert!(interval(0.0, "seconds").is_err());
        assert!(interval(-1.0, "minutes").is_err());
        assert!(interval(f64::NAN, "hours").is_err());
    }
}
