pub mod args;
pub mod error;
pub mod model;
pub mod mvu;
pub mod view;
pub mod controller {
    pub mod api;
    pub mod segments;
    pub mod state;
    pub mod strava;
}

const HTMX_PATH: &str = "https://unpkg.com/htmx.org@1.9.12";
const LEAFLET_CSS_PATH: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS_PATH: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

pub use controller::segments::configure;
pub use controller::state::AppState;
pub use error::{AppError, AppResult};
