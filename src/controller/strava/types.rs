use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://www.strava.com/api/v3";
pub const DEFAULT_OAUTH_BASE: &str = "https://www.strava.com/oauth";
pub const SEGMENT_URL_BASE: &str = "https://www.strava.com/segments";

/// Seconds before `expires_at` at which a token is treated as expired.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Clone, Debug)]
pub struct StravaConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub api_base: String,
    pub oauth_base: String,
}

impl StravaConfig {
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            api_base: DEFAULT_API_BASE.to_string(),
            oauth_base: DEFAULT_OAUTH_BASE.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StravaAthlete {
    pub id: i64,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

impl StravaAthlete {
    /// Name used when claiming a segment as this athlete.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            format!("athlete {}", self.id)
        } else {
            name
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StravaToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    #[serde(default)]
    pub athlete: Option<StravaAthlete>,
}

impl StravaToken {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() + EXPIRY_SKEW_SECS >= self.expires_at
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct SummarySegment {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SegmentMap {
    #[serde(default)]
    pub polyline: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct AthleteSegmentStats {
    #[serde(default)]
    pub pr_elapsed_time: Option<u32>,
    #[serde(default)]
    pub pr_date: Option<String>,
    #[serde(default)]
    pub effort_count: Option<u32>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Xoms {
    #[serde(default)]
    pub kom: Option<String>,
    #[serde(default)]
    pub qom: Option<String>,
    #[serde(default)]
    pub overall: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct DetailedSegment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    #[serde(default)]
    pub climb_category: Option<i32>,
    #[serde(default)]
    pub start_latlng: Option<Vec<f64>>,
    #[serde(default)]
    pub map: Option<SegmentMap>,
    #[serde(default)]
    pub effort_count: Option<u32>,
    #[serde(default)]
    pub athlete_segment_stats: Option<AthleteSegmentStats>,
    #[serde(default)]
    pub xoms: Option<Xoms>,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
}
