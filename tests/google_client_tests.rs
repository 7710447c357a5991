#![allow(clippy::unwrap_used, clippy::panic)]

use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cozy_gym_bot::services::google::{CalendarApi, GoogleClient, GoogleError, GoogleOAuthConfig};

fn client_for(server: &MockServer) -> Result<GoogleClient> {
    let oauth = GoogleOAuthConfig {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "https://gym.example.com/oauth/google/callback".to_string(),
    };
    Ok(GoogleClient::new(oauth)?.with_endpoints(
        format!("{}/token", server.uri()),
        format!("{}/events", server.uri()),
    ))
}

#[tokio::test]
async fn test_exchange_code_posts_form() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("client_secret=client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "expires_in": 3599,
            "refresh_token": "new-refresh",
            "token_type": "Bearer",
            "scope": "https://www.googleapis.com/auth/calendar.readonly"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let grant = client_for(&server)?.exchange_code("auth-code").await?;

    assert_eq!(grant.access_token, "new-access");
    assert_eq!(grant.expires_in, 3599);
    assert_eq!(grant.refresh_token.as_deref(), Some("new-refresh"));
    Ok(())
}

#[tokio::test]
async fn test_refresh_without_new_refresh_token() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    let grant = client_for(&server)?.refresh_access_token("old-refresh").await?;

    assert_eq!(grant.access_token, "fresh");
    assert!(grant.refresh_token.is_none());
    assert!(grant.token_type.is_none());
    Ok(())
}

#[tokio::test]
async fn test_list_events_sends_bearer_and_query() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(header("authorization", "Bearer access-1"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .and(query_param("timeMin", "1970-01-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "calendar#events",
            "items": [
                {
                    "id": "evt-1",
                    "summary": "Ivan legs",
                    "start": { "dateTime": "2026-03-07T18:30:00+03:00" },
                    "end": { "dateTime": "2026-03-07T19:30:00+03:00" }
                },
                {
                    "id": "evt-2",
                    "start": { "date": "2026-03-08" },
                    "end": { "date": "2026-03-09" }
                }
            ]
        })))
        .mount(&server)
        .await;

    let events = client_for(&server)?.list_events("access-1").await?;

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].summary_or_default(), "Ivan legs");
    let (start, _) = events[0].time_range().unwrap();
    assert_eq!(start.to_rfc3339(), "2026-03-07T15:30:00+00:00");
    assert!(events[1].time_range().is_none());
    Ok(())
}

#[tokio::test]
async fn test_missing_items_is_empty() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "calendar#events" })))
        .mount(&server)
        .await;

    let events = client_for(&server)?.list_events("access-1").await?;

    assert!(events.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_error_status_is_reported() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let result = client_for(&server)?.list_events("expired").await;

    match result {
        Err(GoogleError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid credentials");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    Ok(())
}
