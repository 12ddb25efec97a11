use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;
use crate::model::{
    NewSegment, Segment, SegmentPatch, derive_pace, non_blank, parse_duration, strava_id_from_url,
};

fn parse_f64(field: &str, value: Option<&str>) -> Result<Option<f64>, AppError> {
    non_blank(value)
        .map(|v| {
            v.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| AppError::Invalid(format!("{field}: '{v}' is not a number")))
        })
        .transpose()
}

fn parse_u32(field: &str, value: Option<&str>) -> Result<Option<u32>, AppError> {
    non_blank(value)
        .map(|v| {
            v.parse::<u32>()
                .map_err(|_| AppError::Invalid(format!("{field}: '{v}' is not a whole number")))
        })
        .transpose()
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    non_blank(value)
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|_| AppError::Invalid(format!("{field}: '{v}' is not a YYYY-MM-DD date")))
        })
        .transpose()
}

fn parse_time(value: Option<&str>) -> Result<Option<u32>, AppError> {
    non_blank(value).map(|v| parse_duration(&v)).transpose()
}

#[derive(Deserialize, Debug, Default)]
pub struct NewSegmentForm {
    pub name: String,
    pub distance_km: Option<String>,
    pub elevation_gain: Option<String>,
    pub elevation_loss: Option<String>,
    pub difficulty: Option<String>,
    pub crown_holder: Option<String>,
    pub crown_time: Option<String>,
    pub pb_time: Option<String>,
    pub pb_attempts: Option<String>,
    pub attempts: Option<String>,
    pub last_attempt_date: Option<String>,
    pub strava_url: Option<String>,
    pub polyline: Option<String>,
    pub start_latitude: Option<String>,
    pub start_longitude: Option<String>,
    /// Table state (`sort`, `q`, ...) sent alongside the segment fields.
    #[serde(flatten)]
    pub table: HashMap<String, String>,
}

impl NewSegmentForm {
    /// # Errors
    ///
    /// Will return `Err` if the name is blank or a field does not parse
    pub fn into_new_segment(self) -> Result<NewSegment, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Invalid("a segment needs a name".into()));
        }

        let distance = parse_f64("distance", self.distance_km.as_deref())?.map(|km| km * 1000.0);
        let crown_time = parse_time(self.crown_time.as_deref())?;
        let pb_time = parse_time(self.pb_time.as_deref())?;
        let strava_url = non_blank(self.strava_url.as_deref());
        let start_latitude = parse_f64("start latitude", self.start_latitude.as_deref())?;
        let start_longitude = parse_f64("start longitude", self.start_longitude.as_deref())?;
        if start_latitude.is_some() != start_longitude.is_some() {
            return Err(AppError::Invalid(
                "start latitude and longitude go together".into(),
            ));
        }

        let polyline = non_blank(self.polyline.as_deref());
        if let Some(p) = &polyline {
            crate::model::polyline::decode(p)?;
        }

        Ok(NewSegment {
            name,
            distance,
            elevation_gain: parse_f64("elevation gain", self.elevation_gain.as_deref())?,
            elevation_loss: parse_f64("elevation loss", self.elevation_loss.as_deref())?,
            crown_holder: non_blank(self.crown_holder.as_deref()),
            crown_time,
            crown_pace: derive_pace(crown_time, distance),
            pb_time,
            pb_pace: derive_pace(pb_time, distance),
            pb_attempts: parse_u32("PB attempts", self.pb_attempts.as_deref())?,
            attempts: parse_u32("attempts", self.attempts.as_deref())?,
            difficulty: non_blank(self.difficulty.as_deref()),
            last_attempt_date: parse_date("last attempt", self.last_attempt_date.as_deref())?,
            strava_id: strava_url.as_deref().and_then(strava_id_from_url),
            strava_url,
            polyline,
            start_latitude,
            start_longitude,
            ..NewSegment::default()
        })
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ClaimForm {
    pub claim: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CrownForm {
    pub crown_holder: Option<String>,
    pub crown_date: Option<String>,
    pub crown_time: Option<String>,
    pub crown_pace: Option<String>,
}

impl CrownForm {
    /// Blank fields clear the stored value. A blank pace is derived from
    /// the time and the segment's distance.
    ///
    /// # Errors
    ///
    /// Will return `Err` if a date or time does not parse
    pub fn into_patch(self, segment: &Segment) -> Result<SegmentPatch, AppError> {
        let crown_time = parse_time(self.crown_time.as_deref())?;
        let crown_pace = match parse_time(self.crown_pace.as_deref())? {
            Some(secs) => Some(f64::from(secs)),
            None => derive_pace(crown_time, segment.distance),
        };
        Ok(SegmentPatch {
            crown_holder: Some(non_blank(self.crown_holder.as_deref())),
            crown_date: Some(parse_date("crown date", self.crown_date.as_deref())?),
            crown_time: Some(crown_time),
            crown_pace: Some(crown_pace),
            ..SegmentPatch::default()
        })
    }
}
