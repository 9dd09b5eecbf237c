use actix_web::{HttpResponse, Responder, get, post, web};
use chrono::Utc;
use log::info;

use super::models::{AppState, ErrorResponse};

/// Look up a block on the local chain.
#[get("/chain/blocks/{number}/")]
pub async fn get_block(state: web::Data<AppState>, path: web::Path<u64>) -> impl Responder {
    let number = path.into_inner();
    match state.chain.get(number) {
        Some(block) => HttpResponse::Ok().json(block),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("block {number} does not exist"),
        }),
    }
}

/// Produce a new block stamped with the current time.
#[post("/chain/blocks/")]
pub async fn produce_block(state: web::Data<AppState>) -> impl Responder {
    let block = state.chain.append_block(Utc::now().timestamp());
    info!("CHAIN - produced block {} at ts={}", block.number, block.timestamp);
    HttpResponse::Created().json(block)
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use std::sync::Arc;

    use crate::api::{AppState, init_routes};
    use crate::blockchain::{Block, Blockchain};
    use crate::estimator::BlockTimeEstimator;

    #[actix_web::test]
    async fn get_and_produce_blocks() {
        let chain = Arc::new(Blockchain::from_timestamps([100, 103, 106]));
        let state = web::Data::new(AppState::new(
            chain.clone(),
            BlockTimeEstimator::new(chain.clone()),
        ));
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/chain/blocks/1/")
            .to_request();
        let block: Block = test::call_and_read_body_json(&app, req).await;
        assert_eq!(block, Block { number: 1, timestamp: 103 });

        let req = test::TestRequest::get()
            .uri("/api/v1/chain/blocks/3/")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/v1/chain/blocks/")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let produced: Block = test::read_body_json(resp).await;
        assert_eq!(produced.number, 3);
        assert_eq!(chain.len(), 4);
    }
}
