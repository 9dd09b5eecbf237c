use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;
use std::io;
use std::sync::Arc;

use block_time_estimator::api::{self, AppState};
use block_time_estimator::blockchain::Blockchain;
use block_time_estimator::config::Settings;
use block_time_estimator::estimator::BlockTimeEstimator;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let settings = Settings::from_env().map_err(io::Error::other)?;

    let chain = Arc::new(Blockchain::simulated(&settings.simulation));
    let mut estimator = BlockTimeEstimator::configure(chain.clone(), &settings.estimator)
        .map_err(io::Error::other)?;
    estimator
        .initialize(settings.reference_block)
        .await
        .map_err(io::Error::other)?;

    info!(
        "⛓️ Starting block time API at http://{}:{} ({} simulated blocks)",
        settings.host,
        settings.port,
        chain.len()
    );

    let state = web::Data::new(AppState::new(chain, estimator));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
