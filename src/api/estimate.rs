use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info};

use super::models::{
    AppState, EstimateResponse, InitRequest, IntervalQuery, IntervalResponse, NowResponse,
    OffsetQuery, ReferenceResponse, error_response,
};
use crate::estimator::Offset;

/// Current chain head.
#[get("/now/")]
pub async fn get_now(state: web::Data<AppState>) -> impl Responder {
    match state.estimator().now().await {
        Ok(head) => HttpResponse::Ok().json(NowResponse { head }),
        Err(e) => error_response(&e),
    }
}

/// Reference block and its timestamp.
#[get("/reference/")]
pub async fn get_reference(state: web::Data<AppState>) -> impl Responder {
    let estimator = state.estimator();
    let reference_block = match estimator.reference_block() {
        Ok(block) => block,
        Err(e) => return error_response(&e),
    };
    match estimator.current_timestamp().await {
        Ok(timestamp) => HttpResponse::Ok().json(ReferenceResponse {
            reference_block,
            timestamp,
        }),
        Err(e) => error_response(&e),
    }
}

/// Re-pin the reference block (chain head when `block` is omitted).
#[post("/reference/")]
pub async fn set_reference(
    state: web::Data<AppState>,
    req: Option<web::Json<InitRequest>>,
) -> impl Responder {
    let block = req.map(|r| r.into_inner()).unwrap_or_default().block;

    // Initialize a snapshot, then publish it; no lock is held across the provider query
    let mut estimator = state.estimator();
    let reference_block = match estimator.initialize(block).await {
        Ok(reference) => reference,
        Err(e) => return error_response(&e),
    };
    let timestamp = match estimator.current_timestamp().await {
        Ok(ts) => ts,
        Err(e) => return error_response(&e),
    };
    *state.estimator.lock().expect("mutex poisoned") = estimator;

    info!("API - reference block re-pinned to {}", reference_block);
    HttpResponse::Ok().json(ReferenceResponse {
        reference_block,
        timestamp,
    })
}

/// Look back from the reference block by a block count or a duration.
#[get("/subtract/")]
pub async fn subtract(state: web::Data<AppState>, q: web::Query<OffsetQuery>) -> impl Responder {
    let offset = match Offset::parse(q.amount, &q.unit) {
        Ok(offset) => offset,
        Err(e) => return error_response(&e),
    };
    let estimator = state.estimator();
    let result = match estimator.subtract(offset).await {
        Ok(estimate) => estimate,
        Err(e) => return error_response(&e),
    };
    debug!("API - subtract {} -> {:?}", offset, result);

    match estimator.reference_block() {
        Ok(reference) => {
            HttpResponse::Ok().json(EstimateResponse::new(reference, offset.to_string(), result))
        }
        Err(e) => error_response(&e),
    }
}

/// Forecast forward from the reference block.
#[get("/add/")]
pub async fn add(state: web::Data<AppState>, q: web::Query<OffsetQuery>) -> impl Responder {
    let offset = match Offset::parse(q.amount, &q.unit) {
        Ok(offset) => offset,
        Err(e) => return error_response(&e),
    };
    let estimator = state.estimator();
    let result = match estimator.add(offset).await {
        Ok(estimate) => estimate,
        Err(e) => return error_response(&e),
    };
    debug!("API - add {} -> {:?}", offset, result);

    match estimator.reference_block() {
        Ok(reference) => {
            HttpResponse::Ok().json(EstimateResponse::new(reference, offset.to_string(), result))
        }
        Err(e) => error_response(&e),
    }
}

/// Seconds elapsed between two blocks.
#[get("/interval/")]
pub async fn interval(state: web::Data<AppState>, q: web::Query<IntervalQuery>) -> impl Responder {
    match state.estimator().block_interval(q.start, q.end).await {
        Ok(seconds) => HttpResponse::Ok().json(IntervalResponse {
            start: q.start,
            end: q.end,
            seconds,
        }),
        Err(e) => error_response(&e),
    }
}
