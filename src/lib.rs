//! Block/time offset estimation for chains with a roughly constant block rate.
//!
//! [`estimator::BlockTimeEstimator`] maps wall-clock offsets from a reference block onto
//! block numbers (and block offsets onto timestamps), refining past lookups against
//! real block timestamps from a [`estimator::ChainDataProvider`].

pub mod api;
pub mod blockchain;
pub mod config;
pub mod estimator;
