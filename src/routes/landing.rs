// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Landing page with the Strava login link.

use crate::error::Result;
use crate::AppState;
use askama::Template;
use axum::{extract::State, response::Html, routing::get, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(landing))
}

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingPage {
    auth_url: String,
    logged_in: bool,
    default_after: String,
    default_before: String,
}

/// Every visit issues a new authorization nonce.
async fn landing(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let page = LandingPage {
        auth_url: state.oauth.authorization_url(),
        logged_in: state.session.access_token().await.is_some(),
        default_after: state.config.default_after.clone(),
        default_before: state.config.default_before.clone(),
    };
    super::render(&page)
}
