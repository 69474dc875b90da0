// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use plotted::config::Config;
use plotted::routes::create_router;
use plotted::services::{PolylineCache, StravaClient};
use plotted::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Polyline for the single point (38.5, -120.2).
#[allow(dead_code)]
pub const POINT_POLYLINE: &str = "_p~iF~ps|U";

/// Test app wired to a mock Strava server and a temporary cache directory.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub strava: MockServer,
    pub cache: PolylineCache,
    pub cache_dir: TempDir,
}

/// Strava client pointed at the mock server.
#[allow(dead_code)]
pub fn strava_client(server: &MockServer) -> StravaClient {
    StravaClient::with_base_urls(
        "test_client_id".to_string(),
        "test_secret".to_string(),
        format!("{}/api/v3", server.uri()),
        format!("{}/oauth", server.uri()),
    )
}

/// Temporary polyline cache.
#[allow(dead_code)]
pub async fn test_cache() -> (PolylineCache, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let cache = PolylineCache::open(dir.path())
        .await
        .expect("Failed to open cache");
    (cache, dir)
}

/// Create a test app with a mock Strava server.
#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    let strava = MockServer::start().await;
    let (cache, cache_dir) = test_cache().await;

    let config = Config {
        cache_dir: cache_dir.path().to_path_buf(),
        ..Config::default()
    };

    let state = Arc::new(AppState::new(config, strava_client(&strava), cache.clone()));

    TestApp {
        router: create_router(state.clone()),
        state,
        strava,
        cache,
        cache_dir,
    }
}

/// Summary as returned by the list endpoint.
#[allow(dead_code)]
pub fn summary(id: u64, summary_polyline: Option<&str>) -> Value {
    match summary_polyline {
        Some(p) => json!({ "id": id, "name": format!("Activity {}", id), "map": { "summary_polyline": p } }),
        None => json!({ "id": id, "name": format!("Activity {}", id) }),
    }
}

/// Serve `pages` as pages 1..=n of the activity list, then an empty page.
#[allow(dead_code)]
pub async fn mount_activity_pages(server: &MockServer, pages: Vec<Vec<Value>>) {
    let last = pages.len() as u32 + 1;
    for (i, batch) in pages.into_iter().enumerate() {
        Mock::given(method("GET"))
            .and(path("/api/v3/athlete/activities"))
            .and(query_param("page", (i + 1).to_string()))
            .and(query_param("per_page", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(batch)))
            .expect(1)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", last.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(server)
        .await;
}

/// Serve an activity detail with the given polyline, expecting `calls` hits.
#[allow(dead_code)]
pub async fn mount_activity_detail(server: &MockServer, id: u64, polyline: &str, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/activities/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "map": { "polyline": polyline, "summary_polyline": polyline }
        })))
        .expect(calls)
        .mount(server)
        .await;
}

/// Assert that an activity detail is never requested.
#[allow(dead_code)]
pub async fn forbid_activity_detail(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/activities/{}", id)))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
