// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map page: aggregate the routes for a date range and draw them.

use crate::error::{AppError, Result};
use crate::middleware::AccessToken;
use crate::models::{DateRange, DecodedRoute};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Map routes (require a session; the middleware is applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/map", get(render_map))
}

/// Query parameters, both `DD/MM/YYYY`. Missing values use the configured
/// defaults.
#[derive(Debug, Deserialize)]
pub struct MapParams {
    after: Option<String>,
    before: Option<String>,
}

#[derive(Template)]
#[template(path = "map.html")]
struct MapPage {
    after: String,
    before: String,
    route_count: usize,
    skipped_count: usize,
    listing_error: Option<String>,
    /// JSON array of routes, safe to embed in a script element
    routes_json: String,
    /// JSON string literal, safe to embed in a script element
    mapbox_token_json: String,
}

async fn render_map(
    State(state): State<Arc<AppState>>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    Query(params): Query<MapParams>,
) -> Result<Html<String>> {
    let after = params
        .after
        .unwrap_or_else(|| state.config.default_after.clone());
    let before = params
        .before
        .unwrap_or_else(|| state.config.default_before.clone());
    let range = DateRange::parse(&after, &before)?;

    tracing::info!(after = %after, before = %before, "Rendering map");
    let result = state.aggregator.aggregate(&token, &range).await;

    let page = MapPage {
        after,
        before,
        route_count: result.routes.len(),
        skipped_count: result.skipped.len(),
        listing_error: result.listing_error,
        routes_json: script_json(&RouteData::from(result.routes.as_slice()))?,
        mapbox_token_json: script_json(&state.config.mapbox_token)?,
    };
    super::render(&page)
}

/// Shape consumed by the map script: one array of `[lat, lon]` per route.
#[derive(Serialize)]
struct RouteData<'a>(Vec<&'a [[f64; 2]]>);

impl<'a> From<&'a [DecodedRoute]> for RouteData<'a> {
    fn from(routes: &'a [DecodedRoute]) -> Self {
        Self(routes.iter().map(|r| r.coordinates.as_slice()).collect())
    }
}

/// Serialize a value for an inline `<script>`, so that `</script>` inside a
/// string cannot close the element early.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map(|json| json.replace("</", "<\\/"))
        .map_err(|e| AppError::Internal(e.into()))
}
