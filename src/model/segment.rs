use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::polyline::LatLng;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub elevation_gain: Option<f64>,
    #[serde(default)]
    pub elevation_loss: Option<f64>,
    #[serde(default)]
    pub crown_holder: Option<String>,
    #[serde(default)]
    pub crown_date: Option<NaiveDate>,
    #[serde(default)]
    pub crown_time: Option<u32>,
    #[serde(default)]
    pub crown_pace: Option<f64>,
    #[serde(default)]
    pub pb_time: Option<u32>,
    #[serde(default)]
    pub pb_pace: Option<f64>,
    #[serde(default)]
    pub pb_attempts: Option<u32>,
    #[serde(default)]
    pub attempts: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub last_attempt_date: Option<NaiveDate>,
    #[serde(default)]
    pub strava_id: Option<i64>,
    #[serde(default)]
    pub strava_url: Option<String>,
    #[serde(default)]
    pub polyline: Option<String>,
    #[serde(default)]
    pub start_latitude: Option<f64>,
    #[serde(default)]
    pub start_longitude: Option<f64>,
    #[serde(default)]
    pub claim: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Segment {
    #[must_use]
    pub fn start(&self) -> Option<LatLng> {
        match (self.start_latitude, self.start_longitude) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.claim.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// A segment as submitted for creation; the server assigns the id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewSegment {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crown_holder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crown_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crown_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crown_pace: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pb_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pb_pace: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pb_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_attempt_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strava_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strava_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polyline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,
    pub completed: bool,
}

impl NewSegment {
    /// The record the server would hold after assigning `id`.
    #[must_use]
    pub fn into_segment(self, id: i64) -> Segment {
        Segment {
            id,
            name: self.name,
            distance: self.distance,
            elevation_gain: self.elevation_gain,
            elevation_loss: self.elevation_loss,
            crown_holder: self.crown_holder,
            crown_date: self.crown_date,
            crown_time: self.crown_time,
            crown_pace: self.crown_pace,
            pb_time: self.pb_time,
            pb_pace: self.pb_pace,
            pb_attempts: self.pb_attempts,
            attempts: self.attempts,
            difficulty: self.difficulty,
            last_attempt_date: self.last_attempt_date,
            strava_id: self.strava_id,
            strava_url: self.strava_url,
            polyline: self.polyline,
            start_latitude: self.start_latitude,
            start_longitude: self.start_longitude,
            claim: self.claim,
            completed: self.completed,
        }
    }
}

/// Partial update. The outer `None` leaves a field alone; `Some(None)` is
/// sent as `null` and clears it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crown_holder: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crown_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crown_time: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crown_pace: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl SegmentPatch {
    #[must_use]
    pub fn claim(claim: Option<String>) -> Self {
        Self {
            claim: Some(claim),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch locally, the way the server is expected to.
    pub fn apply_to(&self, segment: &mut Segment) {
        if let Some(claim) = &self.claim {
            segment.claim.clone_from(claim);
        }
        if let Some(holder) = &self.crown_holder {
            segment.crown_holder.clone_from(holder);
        }
        if let Some(date) = self.crown_date {
            segment.crown_date = date;
        }
        if let Some(time) = self.crown_time {
            segment.crown_time = time;
        }
        if let Some(pace) = self.crown_pace {
            segment.crown_pace = pace;
        }
        if let Some(completed) = self.completed {
            segment.completed = completed;
        }
    }
}

/// Seconds per kilometre for `seconds` over `meters`.
#[must_use]
pub fn derive_pace(seconds: Option<u32>, meters: Option<f64>) -> Option<f64> {
    match (seconds, meters) {
        (Some(s), Some(m)) if m > 0.0 => Some(f64::from(s) / (m / 1000.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_record() {
        let json = r#"{"id": 7, "name": "Hawk Hill"}"#;
        let segment: Segment = serde_json::from_str(json).unwrap();
        assert_eq!(segment.id, 7);
        assert_eq!(segment.name, "Hawk Hill");
        assert!(segment.distance.is_none());
        assert!(!segment.completed);
        assert!(!segment.is_claimed());
    }

    #[test]
    fn patch_serializes_only_touched_fields() {
        let patch = SegmentPatch::claim(None);
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"claim":null}"#);

        let patch = SegmentPatch::completed(true);
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"completed":true}"#
        );
        assert!(SegmentPatch::default().is_empty());
    }

    #[test]
    fn pace_needs_positive_distance() {
        assert_eq!(derive_pace(Some(300), Some(1000.0)), Some(300.0));
        assert_eq!(derive_pace(Some(300), Some(0.0)), None);
        assert_eq!(derive_pace(None, Some(1000.0)), None);
    }
}
