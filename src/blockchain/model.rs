use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::RwLock;

use super::Block;
use crate::estimator::{BlockHeader, ChainDataProvider, ProviderError};

/// Shape of a generated block history.
#[derive(Debug, Clone)]
pub struct SimulationParams {
    /// Number of blocks, genesis included.
    pub length: u64,
    /// Mean seconds between blocks.
    pub block_time_secs: u64,
    /// Each gap is `block_time_secs` +/- up to this many seconds (never below 1).
    pub jitter_secs: u64,
    /// Timestamp of the last generated block.
    pub head_timestamp: i64,
    pub seed: u64,
}

/// Simple in-memory chain of block headers, usable as a chain data provider.
#[derive(Debug)]
pub struct Blockchain {
    chain: RwLock<Vec<Block>>,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(genesis_timestamp: i64) -> Self {
        Self {
            chain: RwLock::new(vec![Block::genesis(genesis_timestamp)]),
        }
    }

    /// Chain whose block `n` carries the `n`-th timestamp. An empty iterator
    /// yields a lone genesis block stamped now.
    pub fn from_timestamps(timestamps: impl IntoIterator<Item = i64>) -> Self {
        let mut timestamps = timestamps.into_iter();
        let genesis_ts = timestamps
            .next()
            .unwrap_or_else(|| Utc::now().timestamp());
        let mut chain = vec![Block::genesis(genesis_ts)];
        for ts in timestamps {
            let next = chain[chain.len() - 1].child(ts);
            chain.push(next);
        }
        Self {
            chain: RwLock::new(chain),
        }
    }

    /// Generate a jittered history ending at `params.head_timestamp`.
    /// The same seed always produces the same chain.
    pub fn simulated(params: &SimulationParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let base = i64::try_from(params.block_time_secs.max(1)).unwrap_or(i64::MAX);
        // keeps `base + jitter` and `-jitter` representable
        let jitter = i64::try_from(params.jitter_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX - base);
        let length = params.length.max(1) as usize;

        let mut timestamps = vec![params.head_timestamp; length];
        for n in (0..length - 1).rev() {
            let gap = (base + rng.gen_range(-jitter..=jitter)).max(1);
            timestamps[n] = timestamps[n + 1].saturating_sub(gap);
        }
        debug!(
            "CHAIN - simulated {} blocks from ts={} to ts={}",
            length, timestamps[0], params.head_timestamp
        );
        Self::from_timestamps(timestamps)
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Block {
        let chain = self.chain.read().expect("chain lock poisoned");
        *chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    pub fn get(&self, number: u64) -> Option<Block> {
        let chain = self.chain.read().expect("chain lock poisoned");
        usize::try_from(number)
            .ok()
            .and_then(|idx| chain.get(idx))
            .copied()
    }

    /// Append a block produced at `timestamp` (raised to the head's timestamp if earlier).
    pub fn append_block(&self, timestamp: i64) -> Block {
        let mut chain = self.chain.write().expect("chain lock poisoned");
        let block = chain[chain.len() - 1].child(timestamp);
        chain.push(block);
        block
    }

    /// Block numbers are contiguous from zero and timestamps never decrease.
    pub fn is_valid_chain(&self) -> bool {
        let chain = self.chain.read().expect("chain lock poisoned");
        if chain.is_empty() || chain[0].number != 0 {
            return false;
        }
        chain.windows(2).all(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            cur.number == prev.number + 1 && cur.timestamp >= prev.timestamp
        })
    }

    /// Mean seconds per block over the last `window` intervals, if the chain is long enough.
    pub fn average_interval(&self, window: usize) -> Option<f64> {
        let chain = self.chain.read().expect("chain lock poisoned");
        if window == 0 || chain.len() < window + 1 {
            return None;
        }
        let newest = chain[chain.len() - 1].timestamp;
        let oldest = chain[chain.len() - 1 - window].timestamp;
        Some((newest - oldest) as f64 / window as f64)
    }

    pub fn len(&self) -> usize {
        self.chain.read().expect("chain lock poisoned").len()
    }
}

#[async_trait]
impl ChainDataProvider for Blockchain {
    async fn block_number(&self) -> Result<u64, ProviderError> {
        Ok(self.last_block().number)
    }

    async fn block(&self, number: u64) -> Result<BlockHeader, ProviderError> {
        self.get(number)
            .map(BlockHeader::from)
            .ok_or(ProviderError::BlockNotFound(number))
    }
}
