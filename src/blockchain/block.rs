use serde::{Deserialize, Serialize};

use crate::estimator::BlockHeader;

/// A block on the local chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis(timestamp: i64) -> Self {
        Self {
            number: 0,
            timestamp,
        }
    }

    /// Create the block following `self`, produced at `timestamp`.
    /// Timestamps never go backwards: an earlier `timestamp` is raised to the parent's.
    pub fn child(&self, timestamp: i64) -> Self {
        Self {
            number: self.number + 1,
            timestamp: timestamp.max(self.timestamp),
        }
    }
}

impl From<Block> for BlockHeader {
    fn from(block: Block) -> Self {
        Self {
            number: block.number,
            timestamp: block.timestamp,
        }
    }
}
