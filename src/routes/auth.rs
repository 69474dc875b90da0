// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth callback route.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth_callback", get(auth_callback))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - verify state, exchange code, then show the default map.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    state
        .oauth
        .complete(
            params.code.as_deref(),
            &params.state,
            params.error.as_deref(),
        )
        .await?;

    Ok(Redirect::to(&default_map_url(
        &state.config.default_after,
        &state.config.default_before,
    )))
}

/// `/map` URL for the configured default date range.
fn default_map_url(after: &str, before: &str) -> String {
    format!(
        "/map?after={}&before={}",
        urlencoding::encode(after),
        urlencoding::encode(before)
    )
}
