use log::{debug, info, warn};
use std::sync::Arc;

use super::calendar;
use super::error::{EstimatorError, Result};
use super::interval::{EstimatorConfig, NominalInterval};
use super::offset::{Estimate, Offset};
use super::provider::ChainDataProvider;

/// Converts between block offsets and wall-clock offsets relative to a reference block.
///
/// Past lookups are refined against real block timestamps (see [`correct_block`]);
/// future lookups are linear forecasts from the nominal interval.
///
/// [`correct_block`]: BlockTimeEstimator::correct_block
pub struct BlockTimeEstimator<P: ?Sized> {
    provider: Arc<P>,
    interval: NominalInterval,
    max_correction_steps: usize,
    reference: Option<u64>,
}

impl<P: ?Sized> Clone for BlockTimeEstimator<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            interval: self.interval,
            max_correction_steps: self.max_correction_steps,
            reference: self.reference,
        }
    }
}

impl<P: ChainDataProvider + ?Sized> BlockTimeEstimator<P> {
    /// Estimator with a 3 second nominal interval and the default step cap.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            interval: NominalInterval::default(),
            max_correction_steps: EstimatorConfig::default().max_correction_steps,
            reference: None,
        }
    }

    /// Validate `config` and build an uninitialized estimator from it.
    pub fn configure(provider: Arc<P>, config: &EstimatorConfig) -> Result<Self> {
        let interval = NominalInterval::try_from(&config.block_interval)?;
        if config.max_correction_steps == 0 {
            return Err(EstimatorError::InvalidConfiguration(
                "max_correction_steps must be at least 1".into(),
            ));
        }
        Ok(Self {
            provider,
            interval,
            max_correction_steps: config.max_correction_steps,
            reference: None,
        })
    }

    /// Pin the reference block: `block` when given, the chain head otherwise.
    pub async fn initialize(&mut self, block: Option<u64>) -> Result<u64> {
        let reference = match block {
            Some(number) => number,
            None => self.provider.block_number().await?,
        };
        self.reference = Some(reference);
        info!(
            "ESTIMATOR - reference block set to {} (nominal interval {})",
            reference, self.interval
        );
        Ok(reference)
    }

    pub fn reference_block(&self) -> Result<u64> {
        self.reference.ok_or(EstimatorError::Uninitialized)
    }

    pub fn nominal_interval(&self) -> NominalInterval {
        self.interval
    }

    pub fn max_correction_steps(&self) -> usize {
        self.max_correction_steps
    }

    /// Timestamp of the reference block.
    pub async fn current_timestamp(&self) -> Result<i64> {
        let reference = self.reference_block()?;
        Ok(self.provider.block_timestamp(reference).await?)
    }

    /// Current chain head, independent of the reference block.
    pub async fn now(&self) -> Result<u64> {
        Ok(self.provider.block_number().await?)
    }

    /// Seconds elapsed from `start_block` to `end_block`; negative when `end_block` is older.
    pub async fn block_interval(&self, start_block: u64, end_block: u64) -> Result<i64> {
        let start = self.provider.block_timestamp(start_block).await?;
        let end = self.provider.block_timestamp(end_block).await?;
        Ok(end - start)
    }

    /// Look back from the reference block.
    ///
    /// A block offset yields the timestamp of the block that many blocks back
    /// (never below genesis). A duration offset yields the block produced around
    /// that long before the reference block.
    pub async fn subtract(&self, offset: Offset) -> Result<Estimate> {
        let reference = self.reference_block()?;

        match offset {
            Offset::Blocks(count) => {
                let target = reference.saturating_sub(count);
                let timestamp = self.provider.block_timestamp(target).await?;
                Ok(Estimate::Timestamp(calendar::to_datetime(timestamp)?))
            }
            Offset::Duration { amount, unit } => {
                let current = self.current_timestamp().await?;
                let target = calendar::subtract(current, amount, unit)?;
                let elapsed = (current - target) as f64;
                let estimate = clamp_block(
                    (reference as f64 - elapsed / self.interval.as_secs_f64()).ceil(),
                    reference,
                );
                debug!(
                    "ESTIMATOR - {} back from block {} targets ts={}, linear estimate {}",
                    offset, reference, target, estimate
                );
                let block = self.correct_block(estimate, target).await?;
                Ok(Estimate::Block(block))
            }
        }
    }

    /// Forecast forward from the reference block. Nothing is verified against the
    /// chain since future blocks do not exist yet.
    pub async fn add(&self, offset: Offset) -> Result<Estimate> {
        let reference = self.reference_block()?;
        let current = self.current_timestamp().await?;
        let interval = self.interval.as_secs_f64();

        match offset {
            Offset::Blocks(count) => {
                let ahead = (count as f64 * interval).round() as i64;
                let forecast = current
                    .checked_add(ahead)
                    .ok_or(EstimatorError::TimestampOutOfRange)?;
                Ok(Estimate::Timestamp(calendar::to_datetime(forecast)?))
            }
            Offset::Duration { amount, unit } => {
                let next = calendar::add(current, amount, unit)?;
                let blocks_ahead = (next - current) as f64 / interval;
                let forecast = (reference as f64 + blocks_ahead).ceil();
                if forecast >= u64::MAX as f64 {
                    return Err(EstimatorError::TimestampOutOfRange);
                }
                Ok(Estimate::Block(forecast as u64))
            }
        }
    }

    /// Walk `candidate_block` toward the block whose timestamp is within one nominal
    /// interval of `expected_timestamp`.
    ///
    /// Each step fetches the candidate's timestamp and jumps by the remaining gap
    /// divided by the nominal interval. Candidates stay inside `[0, reference]`. Fails
    /// with `NonConvergence` once `max_correction_steps` queries have been spent, or
    /// earlier when clamping pins the candidate at a boundary block that is still
    /// outside the band (the target predates genesis or postdates the reference).
    pub async fn correct_block(
        &self,
        candidate_block: u64,
        expected_timestamp: i64,
    ) -> Result<u64> {
        let reference = self.reference_block()?;
        let interval = self.interval.as_secs_f64();
        let mut candidate = candidate_block.min(reference);

        for step in 1..=self.max_correction_steps {
            let actual = self.provider.block_timestamp(candidate).await?;
            let delta = expected_timestamp - actual;
            debug!(
                "ESTIMATOR - step {}: block {} ts={} delta={}s",
                step, candidate, actual, delta
            );

            // An exact hit counts as converged.
            if (delta as f64).abs() < interval {
                return Ok(candidate);
            }

            let next = clamp_block(
                (candidate as f64 + delta as f64 / interval).ceil(),
                reference,
            );
            if next == candidate {
                warn!(
                    "ESTIMATOR - ts={} lies outside blocks 0..={}, stuck at block {} (delta={}s)",
                    expected_timestamp, reference, candidate, delta
                );
                return Err(EstimatorError::NonConvergence {
                    target: expected_timestamp,
                    steps: step,
                    last_block: candidate,
                });
            }
            candidate = next;
        }

        warn!(
            "ESTIMATOR - no convergence on ts={} after {} steps (last block {})",
            expected_timestamp, self.max_correction_steps, candidate
        );
        Err(EstimatorError::NonConvergence {
            target: expected_timestamp,
            steps: self.max_correction_steps,
            last_block: candidate,
        })
    }
}

/// Whole-block estimate clamped to `[0, reference]`.
fn clamp_block(estimate: f64, reference: u64) -> u64 {
    if estimate <= 0.0 {
        0
    } else if estimate >= reference as f64 {
        reference
    } else {
        estimate as u64
    }
}
