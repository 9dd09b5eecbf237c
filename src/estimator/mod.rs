pub mod block_time;
pub mod calendar;
pub mod error;
pub mod interval;
pub mod offset;
pub mod provider;

pub use block_time::BlockTimeEstimator;
pub use error::EstimatorError;
pub use interval::{BlockIntervalConfig, EstimatorConfig, NominalInterval};
pub use offset::{DurationUnit, Estimate, Offset};
pub use provider::{BlockHeader, ChainDataProvider, ProviderError};
