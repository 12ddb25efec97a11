use actix_files::Files;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use segment_board::args;
use segment_board::controller::api::RestSegmentApi;
use segment_board::controller::strava::StravaClient;
use segment_board::model::ClaimStore;
use segment_board::{AppState, configure};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("segment_board=info,actix_web=info")),
        )
        .init();

    let args = args::args_checks();

    let api = RestSegmentApi::new(&args.api_base)?;
    let claims = ClaimStore::open(&args.claims_db)?;
    let strava = args.strava.clone().map(StravaClient::new);
    if strava.is_none() {
        tracing::info!("strava is not configured; import is disabled");
    }
    let state = Data::new(AppState::new(
        Arc::new(api),
        claims,
        strava,
        args.page_size,
    ));

    tracing::info!(bind = %args.bind, api = %args.api_base, "starting segment board");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure)
            .service(Files::new("/static", "./static"))
    })
    .bind(args.bind)?
    .run()
    .await?;
    Ok(())
}
