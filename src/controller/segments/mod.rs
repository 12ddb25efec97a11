pub mod forms;
pub mod http_handlers;

use actix_web::web;

pub use http_handlers::OAUTH_STATE_KEY;

/// Registers every page, fragment and action route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use http_handlers as h;
    cfg.route("/", web::get().to(h::index))
        .route("/health", web::get().to(h::health))
        .route("/segments", web::get().to(h::segments_table))
        .route("/segments", web::post().to(h::create_segment))
        .route("/segments/{id}/claim", web::post().to(h::claim))
        .route("/segments/{id}/claim/clear", web::post().to(h::clear_claim))
        .route("/segments/{id}/crown", web::post().to(h::crown))
        .route("/segments/{id}/complete", web::post().to(h::toggle_complete))
        .route("/segments/{id}/delete", web::post().to(h::delete))
        .route("/segments/{id}/map", web::get().to(h::map))
        .route("/strava/import", web::post().to(h::strava_import))
        .route("/strava/connect", web::get().to(h::strava_connect))
        .route("/strava/callback", web::get().to(h::strava_callback));
}
