mod chain;
mod estimate;
mod health;
pub mod models;
mod stats;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(estimate::get_now)
            .service(estimate::get_reference)
            .service(estimate::set_reference)
            .service(estimate::subtract)
            .service(estimate::add)
            .service(estimate::interval)
            .service(stats::get_stats)
            .service(chain::get_block)
            .service(chain::produce_block),
    );
}
