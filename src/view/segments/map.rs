use maud::{Markup, html};
use serde::Serialize;

use crate::model::Segment;
use crate::model::polyline::{self, Bounds, LatLng};

pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 37.7749,
    lng: -122.4194,
};
pub const DEFAULT_ZOOM: u8 = 13;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Marker {
    pub position: [f64; 2],
    pub label: String,
}

/// What the map script needs to draw one segment.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub path: Vec<[f64; 2]>,
    pub bounds: Option<[[f64; 2]; 2]>,
    pub markers: Vec<Marker>,
}

fn decoded_path(segment: &Segment) -> Vec<LatLng> {
    let Some(encoded) = segment.polyline.as_deref().filter(|p| !p.is_empty()) else {
        return Vec::new();
    };
    match polyline::decode(encoded) {
        Ok(points) => points,
        Err(e) => {
            tracing::warn!(segment = segment.id, error = %e, "could not decode polyline");
            Vec::new()
        }
    }
}

/// `None` when there is neither a usable polyline nor start coordinates.
#[must_use]
pub fn map_view(segment: &Segment) -> Option<MapView> {
    let start = segment.start();
    let center = start.unwrap_or(DEFAULT_CENTER).as_pair();
    let path = decoded_path(segment);

    if let (Some(first), Some(last)) = (path.first(), path.last()) {
        let mut markers = vec![Marker {
            position: first.as_pair(),
            label: "Start".into(),
        }];
        if path.len() > 1 {
            markers.push(Marker {
                position: last.as_pair(),
                label: "End".into(),
            });
        }
        let bounds = polyline::bounds(&path).map(|Bounds { south_west, north_east }| {
            [south_west.as_pair(), north_east.as_pair()]
        });
        return Some(MapView {
            center,
            zoom: DEFAULT_ZOOM,
            path: path.iter().map(LatLng::as_pair).collect(),
            bounds,
            markers,
        });
    }

    let start = start?;
    let label = if segment.name.trim().is_empty() {
        "Segment".to_string()
    } else {
        segment.name.clone()
    };
    Some(MapView {
        center,
        zoom: DEFAULT_ZOOM,
        path: Vec::new(),
        bounds: None,
        markers: vec![Marker {
            position: start.as_pair(),
            label,
        }],
    })
}

#[must_use]
pub fn render_segment_map(segment: &Segment) -> Markup {
    let Some(view) = map_view(segment) else {
        return html! {};
    };
    let payload = match serde_json::to_string(&view) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(segment = segment.id, error = %e, "could not serialize map view");
            return html! {};
        }
    };
    html! {
        figure class="segment-map-figure" {
            figcaption { (segment.name) }
            div class="segment-map" id=(format!("map-{}", segment.id)) data-map=(payload)
                style="height: 400px; width: 100%;" {}
        }
    }
}
