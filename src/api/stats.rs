use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};
use crate::blockchain::STATS_WINDOW;

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let estimator = state.estimator();

    let head = state.chain.last_block();
    // last interval
    let last_interval_secs = head
        .number
        .checked_sub(1)
        .and_then(|prev| state.chain.get(prev))
        .map(|prev| head.timestamp - prev.timestamp);

    HttpResponse::Ok().json(StatsResponse {
        head: head.number,
        chain_valid: state.chain.is_valid_chain(),
        reference_block: estimator.reference_block().ok(),
        nominal_interval_secs: estimator.nominal_interval().as_secs_f64(),
        max_correction_steps: estimator.max_correction_steps(),
        stats_window: STATS_WINDOW,
        last_interval_secs,
        avg_interval_secs: state.chain.average_interval(STATS_WINDOW),
    })
}
