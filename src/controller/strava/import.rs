use ahash::AHashSet;
use futures::future::join_all;

use super::client::StravaClient;
use super::types::{DetailedSegment, ImportReport, SEGMENT_URL_BASE, StravaToken, SummarySegment};
use crate::controller::api::SegmentApi;
use crate::error::AppError;
use crate::model::{NewSegment, derive_pace, parse_duration};

pub const STARRED_PAGE_SIZE: u32 = 50;
pub const MAX_STARRED_PAGES: u32 = 20;
const DETAIL_BATCH: usize = 4;

fn difficulty_for(climb_category: Option<i32>) -> Option<String> {
    let label = match climb_category? {
        1 => "Cat 4",
        2 => "Cat 3",
        3 => "Cat 2",
        4 => "Cat 1",
        5 => "HC",
        _ => return None,
    };
    Some(label.to_string())
}

#[must_use]
pub fn to_new_segment(detail: DetailedSegment) -> NewSegment {
    let stats = detail.athlete_segment_stats.unwrap_or_default();
    let crown_time = detail
        .xoms
        .and_then(|x| x.overall.or(x.kom))
        .and_then(|text| match parse_duration(&text) {
            Ok(secs) => Some(secs),
            Err(e) => {
                tracing::warn!(segment = detail.id, error = %e, "unreadable crown time");
                None
            }
        });
    let (start_latitude, start_longitude) = match detail.start_latlng.as_deref() {
        Some([lat, lng]) => (Some(*lat), Some(*lng)),
        _ => (None, None),
    };

    NewSegment {
        name: detail.name,
        distance: detail.distance,
        elevation_gain: detail.total_elevation_gain,
        crown_time,
        crown_pace: derive_pace(crown_time, detail.distance),
        pb_time: stats.pr_elapsed_time,
        pb_pace: derive_pace(stats.pr_elapsed_time, detail.distance),
        pb_attempts: stats.effort_count,
        attempts: detail.effort_count,
        difficulty: difficulty_for(detail.climb_category),
        strava_id: Some(detail.id),
        strava_url: Some(format!("{SEGMENT_URL_BASE}/{}", detail.id)),
        polyline: detail.map.and_then(|m| m.polyline).filter(|p| !p.is_empty()),
        start_latitude,
        start_longitude,
        ..NewSegment::default()
    }
}

/// Every starred segment, page by page until a short page comes back.
///
/// # Errors
///
/// Will return `Err` if any page request fails
pub async fn all_starred(
    strava: &StravaClient,
    token: &StravaToken,
) -> Result<Vec<SummarySegment>, AppError> {
    let mut all = Vec::new();
    for page in 1..=MAX_STARRED_PAGES {
        let batch = strava.starred_segments(token, page, STARRED_PAGE_SIZE).await?;
        let short = batch.len() < STARRED_PAGE_SIZE as usize;
        all.extend(batch);
        if short {
            return Ok(all);
        }
    }
    tracing::warn!(
        pages = MAX_STARRED_PAGES,
        fetched = all.len(),
        "starred page limit reached; later pages were not fetched"
    );
    Ok(all)
}

/// Creates a segment for each starred segment not already tracked.
///
/// Rows that fail to fetch or create are reported, not fatal.
///
/// # Errors
///
/// Will return `Err` if the starred list or the existing segments cannot be loaded
pub async fn import_starred(
    api: &dyn SegmentApi,
    strava: &StravaClient,
    token: &StravaToken,
) -> Result<ImportReport, AppError> {
    let starred = all_starred(strava, token).await?;
    let existing = api.list_segments().await?;
    let mut known: AHashSet<i64> = existing.iter().filter_map(|s| s.strava_id).collect();

    let mut report = ImportReport::default();
    let mut to_fetch = Vec::new();
    for summary in starred {
        if known.insert(summary.id) {
            to_fetch.push(summary);
        } else {
            report.skipped.push(summary.name);
        }
    }

    for chunk in to_fetch.chunks(DETAIL_BATCH) {
        let details = join_all(chunk.iter().map(|s| strava.segment_detail(token, s.id))).await;
        for (summary, detail) in chunk.iter().zip(details) {
            let detail = match detail {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(segment = summary.id, error = %e, "failed to fetch segment detail");
                    report.failed.push((summary.name.clone(), e.to_string()));
                    continue;
                }
            };
            match api.create_segment(&to_new_segment(detail)).await {
                Ok(created) => report.imported.push(created.name),
                Err(e) => {
                    tracing::warn!(segment = summary.id, error = %e, "failed to create segment");
                    report.failed.push((summary.name.clone(), e.to_string()));
                }
            }
        }
    }

    tracing::info!(
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "strava import finished"
    );
    Ok(report)
}
