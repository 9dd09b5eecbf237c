use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The part of a block the estimator reads: its number and production time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub number: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
}

/// Failure reported by a chain data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("block {0} does not exist")]
    BlockNotFound(u64),

    #[error("chain data provider unavailable: {0}")]
    Unavailable(String),
}

/// Block-indexed chain data consumed by the estimator.
///
/// Implementations own their retry and timeout policy; the estimator never
/// retries a failed query.
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    /// Current chain head block number.
    async fn block_number(&self) -> Result<u64, ProviderError>;

    /// Block header for `number`. Fails with `BlockNotFound` past the head.
    async fn block(&self, number: u64) -> Result<BlockHeader, ProviderError>;

    /// Timestamp (UNIX seconds) of block `number`.
    async fn block_timestamp(&self, number: u64) -> Result<i64, ProviderError> {
        Ok(self.block(number).await?.timestamp)
    }
}
