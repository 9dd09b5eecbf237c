pub mod block;
pub mod model;

pub use block::Block;
pub use model::{Blockchain, SimulationParams};

/// Default length of the simulated history seeded at startup.
pub const DEFAULT_SIM_CHAIN_LENGTH: u64 = 10_000;

/// Default block time jitter (+/- seconds) for the simulated history.
pub const DEFAULT_SIM_JITTER_SECS: u64 = 1;

/// How many recent intervals to average when reporting observed block time
pub const STATS_WINDOW: usize = 100;
