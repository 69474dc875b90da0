// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end HTTP tests: landing page, OAuth callback and map rendering.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::{
    create_test_app, mount_activity_detail, mount_activity_pages, summary, TestApp, POINT_POLYLINE,
};

async fn get(app: &TestApp, uri: &str) -> Response {
    app.router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location")
        .to_str()
        .unwrap()
}

/// Issue a nonce the way the landing page does and return it.
fn issue_state(app: &TestApp) -> String {
    let url = app.state.oauth.authorization_url();
    url.rsplit("state=").next().unwrap().to_string()
}

async fn mount_token_endpoint(app: &TestApp, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("code=good-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "session-token",
            "athlete": { "id": 42, "firstname": "Ada" }
        })))
        .expect(calls)
        .mount(&app.strava)
        .await;
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("\"status\":\"ok\""));
}

#[tokio::test]
async fn test_landing_page_embeds_fresh_authorization_url() {
    let app = create_test_app().await;

    let first = body_text(get(&app, "/").await).await;
    let second = body_text(get(&app, "/").await).await;

    assert!(first.contains("/oauth/authorize?"));
    assert!(first.contains("client_id=test_client_id"));
    assert!(first.contains("state="));
    assert_ne!(first, second, "each visit issues a new nonce");
    assert_eq!(app.state.session.pending_states(), 2);
}

#[tokio::test]
async fn test_callback_success_stores_token_and_redirects() {
    let app = create_test_app().await;
    mount_token_endpoint(&app, 1).await;
    let state = issue_state(&app);

    let response = get(
        &app,
        &format!("/auth_callback?code=good-code&state={}", state),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/map?after=30%2F01%2F2018&before=30%2F09%2F2019"
    );
    assert_eq!(
        app.state.session.access_token().await.as_deref(),
        Some("session-token")
    );
}

#[tokio::test]
async fn test_callback_state_mismatch_never_exchanges() {
    let app = create_test_app().await;
    mount_token_endpoint(&app, 0).await;
    issue_state(&app);

    let response = get(&app, "/auth_callback?code=good-code&state=forged").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("state verification failed"));
    assert!(app.state.session.access_token().await.is_none());
}

#[tokio::test]
async fn test_callback_missing_state_is_rejected() {
    let app = create_test_app().await;
    mount_token_endpoint(&app, 0).await;

    let response = get(&app, "/auth_callback?code=good-code").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_replay_is_rejected() {
    let app = create_test_app().await;
    mount_token_endpoint(&app, 1).await;
    let state = issue_state(&app);
    let uri = format!("/auth_callback?code=good-code&state={}", state);

    assert_eq!(get(&app, &uri).await.status(), StatusCode::SEE_OTHER);
    assert_eq!(get(&app, &uri).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_token_exchange_failure() {
    let app = create_test_app().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.strava)
        .await;
    let state = issue_state(&app);

    let response = get(
        &app,
        &format!("/auth_callback?code=good-code&state={}", state),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.state.session.access_token().await.is_none());
}

#[tokio::test]
async fn test_callback_access_denied() {
    let app = create_test_app().await;
    mount_token_endpoint(&app, 0).await;
    let state = issue_state(&app);

    let response = get(
        &app,
        &format!("/auth_callback?error=access_denied&state={}", state),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("access_denied"));
}

#[tokio::test]
async fn test_map_without_session_redirects_to_landing() {
    let app = create_test_app().await;

    let response = get(&app, "/map?after=01/01/2019&before=02/01/2019").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_map_rejects_malformed_dates() {
    let app = create_test_app().await;
    app.state
        .session
        .set_access_token("session-token".to_string())
        .await;

    let response = get(&app, "/map?after=2019-01-01&before=02/01/2019").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/map?after=05/01/2019&before=02/01/2019").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_map_renders_routes() {
    let app = create_test_app().await;
    app.state
        .session
        .set_access_token("session-token".to_string())
        .await;

    mount_activity_pages(
        &app.strava,
        vec![vec![
            summary(1, Some(POINT_POLYLINE)),
            summary(2, Some("")),
            summary(3, Some(POINT_POLYLINE)),
        ]],
    )
    .await;
    mount_activity_detail(&app.strava, 3, POINT_POLYLINE, 1).await;
    app.cache.write(1, POINT_POLYLINE.as_bytes()).await.unwrap();

    let response = get(&app, "/map?after=01%2F01%2F2019&before=02%2F01%2F2019").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("Content-Security-Policy"));
    let body = body_text(response).await;
    assert!(body.contains("const routes = [[[38.5,-120.2]],[[38.5,-120.2]]];"));
    assert!(body.contains("const mapboxToken = \"test_mapbox_token\";"));
    assert!(body.contains("2 routes"));
}
