#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use actix_web::web::Data;
use async_trait::async_trait;
use tokio::sync::Mutex;

use segment_board::AppState;
use segment_board::controller::api::SegmentApi;
use segment_board::controller::strava::{StravaClient, StravaConfig};
use segment_board::error::AppError;
use segment_board::model::{ClaimStore, NewSegment, Segment, SegmentPatch};

/// In-memory stand-in for the segments REST api.
#[derive(Default)]
pub struct FakeApi {
    pub segments: Mutex<Vec<Segment>>,
    next_id: AtomicI64,
    pub fail_updates: AtomicBool,
}

impl FakeApi {
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        let next = segments.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            segments: Mutex::new(segments),
            next_id: AtomicI64::new(next),
            fail_updates: AtomicBool::new(false),
        }
    }

    pub async fn snapshot(&self, id: i64) -> Option<Segment> {
        self.segments.lock().await.iter().find(|s| s.id == id).cloned()
    }
}

#[async_trait]
impl SegmentApi for FakeApi {
    async fn list_segments(&self) -> Result<Vec<Segment>, AppError> {
        Ok(self.segments.lock().await.clone())
    }

    async fn get_segment(&self, id: i64) -> Result<Segment, AppError> {
        self.snapshot(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("segment {id}")))
    }

    async fn create_segment(&self, segment: &NewSegment) -> Result<Segment, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = segment.clone().into_segment(id);
        self.segments.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update_segment(&self, id: i64, patch: &SegmentPatch) -> Result<Segment, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Api {
                status: 503,
                body: "maintenance".into(),
            });
        }
        let mut segments = self.segments.lock().await;
        let segment = segments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("segment {id}")))?;
        patch.apply_to(segment);
        Ok(segment.clone())
    }

    async fn delete_segment(&self, id: i64) -> Result<(), AppError> {
        let mut segments = self.segments.lock().await;
        let before = segments.len();
        segments.retain(|s| s.id != id);
        if segments.len() == before {
            return Err(AppError::NotFound(format!("segment {id}")));
        }
        Ok(())
    }
}

pub struct TestContext {
    pub api: Arc<FakeApi>,
    pub state: Data<AppState>,
}

pub fn setup_test_context(segments: Vec<Segment>) -> Result<TestContext, AppError> {
    let api = Arc::new(FakeApi::with_segments(segments));
    let claims = ClaimStore::open_in_memory()?;
    let state = Data::new(AppState::new(api.clone(), claims, None, 25));
    Ok(TestContext { api, state })
}

/// A Strava client whose api and oauth endpoints live under `base`.
pub fn strava_client(base: &str) -> StravaClient {
    let mut config = StravaConfig::new(
        "123".into(),
        "shh".into(),
        "http://localhost:8081/strava/callback".into(),
    );
    config.api_base = format!("{base}/api/v3");
    config.oauth_base = format!("{base}/oauth");
    StravaClient::new(config)
}

pub fn setup_strava_context(
    segments: Vec<Segment>,
    strava: StravaClient,
) -> Result<TestContext, AppError> {
    let api = Arc::new(FakeApi::with_segments(segments));
    let claims = ClaimStore::open_in_memory()?;
    let state = Data::new(AppState::new(api.clone(), claims, Some(strava), 25));
    Ok(TestContext { api, state })
}

pub fn segment(id: i64, name: &str) -> Segment {
    Segment {
        id,
        name: name.to_string(),
        ..Segment::default()
    }
}
