// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session middleware: routes behind it need a Strava access token.

use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// Strava access token for the current request.
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

/// Middleware that requires a logged-in session.
///
/// Without a token the browser is sent back to the landing page to log in.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = state.session.access_token().await else {
        tracing::info!(path = %request.uri().path(), "No session, redirecting to login");
        return Redirect::to("/").into_response();
    };

    request.extensions_mut().insert(AccessToken(token));
    next.run(request).await
}
