use thiserror::Error;

use super::provider::ProviderError;

/// Errors surfaced by the block time estimator.
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// An operation needed the reference block before `initialize` ran.
    #[error("block time estimator not initialized")]
    Uninitialized,

    /// The chain data provider failed; passed through untouched.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The correction loop hit its step cap without landing inside the interval band.
    #[error(
        "block estimate for timestamp {target} did not converge after {steps} steps (last candidate {last_block})"
    )]
    NonConvergence {
        target: i64,
        steps: usize,
        last_block: u64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid offset: {0}")]
    InvalidOffset(String),

    /// Calendar arithmetic left the representable timestamp range.
    #[error("timestamp out of range")]
    TimestampOutOfRange,
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
