use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use segment_board::controller::api::{RestSegmentApi, SegmentApi};
use segment_board::error::AppError;
use segment_board::model::{NewSegment, SegmentPatch};

async fn api_for(server: &MockServer) -> RestSegmentApi {
    // No trailing slash on purpose: the client must still keep `/api`.
    RestSegmentApi::new(&format!("{}/api", server.uri())).expect("mock server uri is a url")
}

#[tokio::test]
async fn test_list_tolerates_missing_fields() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/segments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Hawk Hill", "distance": 2684.8, "crownTime": 301,
             "lastAttemptDate": "2024-05-01", "completed": true},
            {"id": 2, "name": "Bare"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let segments = api_for(&server).await.list_segments().await?;
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].crown_time, Some(301));
    assert!(segments[0].completed);
    assert_eq!(
        segments[0].last_attempt_date.map(|d| d.to_string()).as_deref(),
        Some("2024-05-01")
    );
    assert_eq!(segments[1].distance, None);
    assert!(!segments[1].completed);
    Ok(())
}

#[tokio::test]
async fn test_create_sends_only_present_fields() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/segments"))
        .and(body_json(json!({"name": "Bofax", "distance": 1200.0, "completed": false})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": 42, "name": "Bofax", "distance": 1200.0})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let new = NewSegment {
        name: "Bofax".into(),
        distance: Some(1200.0),
        ..NewSegment::default()
    };
    let created = api_for(&server).await.create_segment(&new).await?;
    assert_eq!(created.id, 42);
    Ok(())
}

#[tokio::test]
async fn test_patch_sends_null_to_clear() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/segments/7"))
        .and(body_json(json!({"claim": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let updated = api_for(&server)
        .await
        .update_segment(7, &SegmentPatch::claim(None))
        .await?;
    assert_eq!(updated.claim, None);
    Ok(())
}

#[tokio::test]
async fn test_error_statuses_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/segments/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/segments/500"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let api = api_for(&server).await;
    assert!(matches!(
        api.delete_segment(404).await,
        Err(AppError::NotFound(_))
    ));
    match api.delete_segment(500).await {
        Err(AppError::Api { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected an api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    // Nothing listens on port 9 of localhost in a test sandbox.
    let api = RestSegmentApi::new("http://127.0.0.1:9/api").expect("valid url");
    assert!(matches!(
        api.list_segments().await,
        Err(AppError::Network(_))
    ));
}

#[test]
fn test_base_must_be_http() {
    assert!(RestSegmentApi::new("ftp://example.com").is_err());
    assert!(RestSegmentApi::new("not a url").is_err());
}
