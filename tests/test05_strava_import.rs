mod common;

use std::sync::Arc;

use actix_web::web::Data;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{FakeApi, segment, strava_client};
use segment_board::AppState;
use segment_board::controller::strava::{
    MAX_STARRED_PAGES, STARRED_PAGE_SIZE, StravaAthlete, StravaClient, StravaToken, all_starred,
    import_starred,
};
use segment_board::error::AppError;
use segment_board::model::{ClaimStore, STRAVA_TOKEN_KEY, Segment};

fn client_for(server: &MockServer) -> StravaClient {
    strava_client(&server.uri())
}

fn token(expires_at: i64) -> StravaToken {
    StravaToken {
        access_token: "live-token".into(),
        refresh_token: "refresh-me".into(),
        expires_at,
        athlete: Some(StravaAthlete {
            id: 5,
            firstname: Some("Sam".into()),
            lastname: Some("Rider".into()),
        }),
    }
}

fn detail(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "distance": 1000.0,
        "total_elevation_gain": 50.0,
        "climb_category": 2,
        "start_latlng": [37.8, -122.4],
        "map": {"polyline": "_p~iF~ps|U"},
        "effort_count": 1200,
        "athlete_segment_stats": {"pr_elapsed_time": 240, "effort_count": 3},
        "xoms": {"kom": "3:20", "overall": "3:10"}
    })
}

#[tokio::test]
async fn test_import_skips_tracked_and_reports_failures() -> Result<(), Box<dyn std::error::Error>>
{
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/starred"))
        .and(query_param("page", "1"))
        .and(header("authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 100, "name": "Already Here"},
            {"id": 200, "name": "New Climb"},
            {"id": 300, "name": "Gone Private"},
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail(200, "New Climb")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/300"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let api = FakeApi::with_segments(vec![Segment {
        strava_id: Some(100),
        ..segment(1, "Already Here")
    }]);
    let report = import_starred(&api, &client_for(&server), &token(i64::MAX)).await?;

    assert_eq!(report.imported, vec!["New Climb".to_string()]);
    assert_eq!(report.skipped, vec!["Already Here".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "Gone Private");

    let created = api.snapshot(2).await.ok_or("import did not create")?;
    assert_eq!(created.strava_id, Some(200));
    assert_eq!(created.crown_time, Some(190));
    assert_eq!(created.pb_time, Some(240));
    assert_eq!(created.difficulty.as_deref(), Some("Cat 3"));
    assert_eq!(created.start_latitude, Some(37.8));

    // A second run finds nothing new.
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/starred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 100, "name": "Already Here"},
            {"id": 200, "name": "New Climb"},
        ])))
        .mount(&server)
        .await;
    let again = import_starred(&api, &client_for(&server), &token(i64::MAX)).await?;
    assert!(again.imported.is_empty());
    assert_eq!(again.skipped.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_rejected_token_aborts_import() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/starred"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization Error"))
        .mount(&server)
        .await;

    let api = FakeApi::default();
    let result = import_starred(&api, &client_for(&server), &token(i64::MAX)).await;
    assert!(matches!(result, Err(AppError::Auth(_))));
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_stored() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-token",
            "refresh_token": "refresh-again",
            "expires_at": i64::MAX
        })))
        .expect(1)
        .mount(&server)
        .await;

    let claims = ClaimStore::open_in_memory()?;
    claims.put_json(STRAVA_TOKEN_KEY, &token(0))?;
    let state = Data::new(AppState::new(
        Arc::new(FakeApi::default()),
        claims,
        Some(client_for(&server)),
        25,
    ));

    let fresh = state.fresh_token().await?;
    assert_eq!(fresh.access_token, "new-token");
    // The refresh response has no athlete; the old one is kept.
    assert_eq!(state.athlete_name().await.as_deref(), Some("Sam Rider"));

    let stored: Option<StravaToken> = state.claims.lock().await.get_json(STRAVA_TOKEN_KEY)?;
    assert_eq!(stored.map(|t| t.refresh_token).as_deref(), Some("refresh-again"));

    // Still fresh, so no second refresh call.
    state.fresh_token().await?;
    Ok(())
}

fn summaries(first_id: i64, count: usize) -> serde_json::Value {
    (0..count)
        .map(|i| {
            let id = first_id + i as i64;
            json!({"id": id, "name": format!("Segment {id}")})
        })
        .collect()
}

#[tokio::test]
async fn test_starred_fetch_follows_full_pages() -> Result<(), Box<dyn std::error::Error>> {
    let full = STARRED_PAGE_SIZE as usize;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/starred"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", STARRED_PAGE_SIZE.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(summaries(1, full)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/starred"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summaries(1000, 3)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/starred"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let starred = all_starred(&client_for(&server), &token(i64::MAX)).await?;
    assert_eq!(starred.len(), full + 3);
    assert_eq!(starred.first().map(|s| s.id), Some(1));
    assert_eq!(starred.last().map(|s| s.id), Some(1002));
    Ok(())
}

#[tokio::test]
async fn test_starred_fetch_stops_at_page_limit() -> Result<(), Box<dyn std::error::Error>> {
    let full = STARRED_PAGE_SIZE as usize;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/starred"))
        .and(query_param("page", (MAX_STARRED_PAGES + 1).to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/starred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summaries(1, full)))
        .expect(u64::from(MAX_STARRED_PAGES))
        .mount(&server)
        .await;

    let starred = all_starred(&client_for(&server), &token(i64::MAX)).await?;
    assert_eq!(starred.len(), full * MAX_STARRED_PAGES as usize);
    Ok(())
}
