use actix_web::HttpResponse;
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::blockchain::Blockchain;
use crate::estimator::{BlockTimeEstimator, Estimate, EstimatorError, ProviderError};

/// Shared application state: the local chain and the estimator reading from it.
pub struct AppState {
    pub chain: Arc<Blockchain>,
    pub estimator: Mutex<BlockTimeEstimator<Blockchain>>,
}

impl AppState {
    pub fn new(chain: Arc<Blockchain>, estimator: BlockTimeEstimator<Blockchain>) -> Self {
        Self {
            chain,
            estimator: Mutex::new(estimator),
        }
    }

    /// Copy of the current estimator so handlers never await while holding the lock.
    pub fn estimator(&self) -> BlockTimeEstimator<Blockchain> {
        self.estimator.lock().expect("mutex poisoned").clone()
    }
}

/* ---------- Estimator API Models ---------- */

#[derive(Deserialize)]
pub struct OffsetQuery {
    pub amount: u64,
    pub unit: String,
}

#[derive(Deserialize)]
pub struct IntervalQuery {
    pub start: u64,
    pub end: u64,
}

#[derive(Deserialize, Default)]
pub struct InitRequest {
    pub block: Option<u64>,
}

#[derive(Serialize, Deserialize)]
pub struct EstimateResponse {
    pub reference_block: u64,
    pub offset: String,
    pub block: Option<u64>,
    pub timestamp: Option<i64>,
    pub datetime: Option<String>,
}

impl EstimateResponse {
    pub fn new(reference_block: u64, offset: String, estimate: Estimate) -> Self {
        let ts = estimate.timestamp();
        Self {
            reference_block,
            offset,
            block: estimate.block(),
            timestamp: ts.map(|dt| dt.timestamp()),
            datetime: ts.map(|dt| dt.to_rfc3339()),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ReferenceResponse {
    pub reference_block: u64,
    pub timestamp: i64,
}

#[derive(Serialize, Deserialize)]
pub struct NowResponse {
    pub head: u64,
}

#[derive(Serialize, Deserialize)]
pub struct IntervalResponse {
    pub start: u64,
    pub end: u64,
    pub seconds: i64,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub head: u64,
    pub chain_valid: bool,
    pub reference_block: Option<u64>,
    pub nominal_interval_secs: f64,
    pub max_correction_steps: usize,
    pub stats_window: usize,
    pub last_interval_secs: Option<i64>,
    pub avg_interval_secs: Option<f64>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map an estimator failure onto an HTTP status with a JSON body.
pub fn error_response(err: &EstimatorError) -> HttpResponse {
    warn!("API - request failed: {}", err);
    let body = ErrorResponse {
        error: err.to_string(),
    };
    match err {
        EstimatorError::Uninitialized => HttpResponse::Conflict().json(body),
        EstimatorError::InvalidOffset(_)
        | EstimatorError::InvalidConfiguration(_)
        | EstimatorError::TimestampOutOfRange => HttpResponse::BadRequest().json(body),
        EstimatorError::Provider(ProviderError::BlockNotFound(_)) => {
            HttpResponse::NotFound().json(body)
        }
        EstimatorError::Provider(ProviderError::Unavailable(_)) => {
            HttpResponse::BadGateway().json(body)
        }
        EstimatorError::NonConvergence { .. } => HttpResponse::UnprocessableEntity().json(body),
    }
}
