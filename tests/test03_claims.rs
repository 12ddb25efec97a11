use segment_board::controller::strava::{StravaAthlete, StravaToken};
use segment_board::model::{ClaimStore, STRAVA_TOKEN_KEY, Segment, overlay_claims};

#[test]
fn test_claim_clear_and_reclaim() -> Result<(), Box<dyn std::error::Error>> {
    let store = ClaimStore::open_in_memory()?;
    assert_eq!(store.get_claim(7)?, None);

    assert_eq!(store.set_claim(7, "  Sam ")?, Some("Sam".to_string()));
    assert_eq!(store.get_claim(7)?.as_deref(), Some("Sam"));

    // Last write wins.
    store.set_claim(7, "Alex")?;
    assert_eq!(store.get_claim(7)?.as_deref(), Some("Alex"));

    assert!(store.clear_claim(7)?);
    assert!(!store.clear_claim(7)?, "clearing twice is a no-op");
    assert_eq!(store.get_claim(7)?, None);

    assert_eq!(store.set_claim(7, "   ")?, None);
    assert!(store.all_claims()?.is_empty());
    Ok(())
}

#[test]
fn test_claims_persist_across_reopen() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("claims.sqlite3");

    {
        let store = ClaimStore::open(&path)?;
        store.set_claim(1, "Sam")?;
        store.set_claim(2, "Alex")?;
        store.put_json(
            STRAVA_TOKEN_KEY,
            &StravaToken {
                access_token: "a".into(),
                refresh_token: "r".into(),
                expires_at: 1_700_000_000,
                athlete: Some(StravaAthlete {
                    id: 9,
                    firstname: Some("Sam".into()),
                    lastname: None,
                }),
            },
        )?;
    }

    let store = ClaimStore::open(&path)?;
    let claims = store.all_claims()?;
    assert_eq!(claims.len(), 2, "the token is not a claim");
    assert_eq!(claims.get(&2).map(String::as_str), Some("Alex"));

    let token: StravaToken = store.get_json(STRAVA_TOKEN_KEY)?.ok_or("token missing")?;
    assert_eq!(token.refresh_token, "r");
    assert_eq!(token.athlete.map(|a| a.display_name()).as_deref(), Some("Sam"));
    Ok(())
}

#[test]
fn test_cached_claims_override_server() -> Result<(), Box<dyn std::error::Error>> {
    let store = ClaimStore::open_in_memory()?;
    store.set_claim(1, "local")?;

    let mut segments = vec![
        Segment {
            id: 1,
            name: "a".into(),
            claim: Some("server".into()),
            ..Segment::default()
        },
        Segment {
            id: 2,
            name: "b".into(),
            claim: Some("server".into()),
            ..Segment::default()
        },
    ];
    overlay_claims(&mut segments, &store.all_claims()?);
    assert_eq!(segments[0].claim.as_deref(), Some("local"));
    assert_eq!(segments[1].claim.as_deref(), Some("server"));
    Ok(())
}

#[test]
fn test_unsynced_clear_hides_server_claim() -> Result<(), Box<dyn std::error::Error>> {
    let store = ClaimStore::open_in_memory()?;
    store.set_claim(1, "local")?;
    store.mark_cleared(1)?;
    assert_eq!(store.get_claim(1)?, None);

    let mut segments = vec![Segment {
        id: 1,
        name: "a".into(),
        claim: Some("server".into()),
        ..Segment::default()
    }];
    overlay_claims(&mut segments, &store.all_claims()?);
    assert_eq!(segments[0].claim, None);

    assert!(store.clear_claim(1)?);
    assert!(store.all_claims()?.is_empty());
    Ok(())
}
