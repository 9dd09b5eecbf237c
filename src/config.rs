use chrono::Utc;
use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::blockchain::{DEFAULT_SIM_CHAIN_LENGTH, DEFAULT_SIM_JITTER_SECS, SimulationParams};
use crate::estimator::interval::{DEFAULT_BLOCK_INTERVAL_SECS, DEFAULT_MAX_CORRECTION_STEPS};
use crate::estimator::{BlockIntervalConfig, EstimatorConfig, NominalInterval};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Service settings read from the environment (and `.env`, loaded in `main`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub estimator: EstimatorConfig,
    /// Reference block to pin at startup; the chain head when unset.
    pub reference_block: Option<u64>,
    pub simulation: SimulationParams,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("PORT")?.unwrap_or(8080);

        let block_interval = BlockIntervalConfig {
            value: parse_var("BLOCK_INTERVAL_VALUE")?.unwrap_or(DEFAULT_BLOCK_INTERVAL_SECS),
            unit: env::var("BLOCK_INTERVAL_UNIT").unwrap_or_else(|_| "seconds".to_string()),
        };
        let max_correction_steps =
            parse_var("MAX_CORRECTION_STEPS")?.unwrap_or(DEFAULT_MAX_CORRECTION_STEPS);

        let simulation = SimulationParams {
            length: parse_var("SIM_CHAIN_LENGTH")?.unwrap_or(DEFAULT_SIM_CHAIN_LENGTH),
            // whole seconds; sub-second intervals simulate as 1s blocks
            block_time_secs: block_interval_secs(&block_interval),
            jitter_secs: parse_var::<u32>("SIM_JITTER_SECS")?
                .map(u64::from)
                .unwrap_or(DEFAULT_SIM_JITTER_SECS),
            head_timestamp: Utc::now().timestamp(),
            seed: parse_var("SIM_SEED")?.unwrap_or(0),
        };

        Ok(Self {
            host,
            port,
            estimator: EstimatorConfig {
                block_interval,
                max_correction_steps,
            },
            reference_block: parse_var("REFERENCE_BLOCK")?,
            simulation,
        })
    }
}

/// `None` when unset or empty, an error when set to something unparsable.
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(None),
    }
}

fn block_interval_secs(config: &BlockIntervalConfig) -> u64 {
    NominalInterval::try_from(config)
        .map(|interval| interval.as_secs_f64().round().max(1.0) as u64)
        .unwrap_or(DEFAULT_BLOCK_INTERVAL_SECS as u64)
}
