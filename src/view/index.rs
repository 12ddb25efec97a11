use maud::{Markup, html};

use crate::{HTMX_PATH, LEAFLET_CSS_PATH, LEAFLET_JS_PATH};

#[must_use]
pub fn render_index_template(title: &str, strava_connected: Option<bool>) -> Markup {
    html! {
        (maud::DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(LEAFLET_CSS_PATH);
                script src=(HTMX_PATH) {}
                script src=(LEAFLET_JS_PATH) {}
                script src="static/segment_map.js" defer {}
            }
            body {
                h1 { (title) }

                @match strava_connected {
                    Some(true) => {
                        button hx-post="strava/import" hx-target="#import-report" hx-swap="innerHTML" {
                            "Import starred segments"
                        }
                    }
                    Some(false) => {
                        a href="strava/connect" { "Connect with Strava" }
                    }
                    None => {}
                }
                div id="import-report" {}

                (crate::view::segments::render_new_segment_form())

                div id="segments" hx-get="segments" hx-trigger="load, segments-changed from:body" hx-swap="innerHTML" {
                    p class="htmx-indicator" { "Loading segments..." }
                }

                div id="segment-map" {}
            }
        }
    }
}
