// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent HTML responses.
//!
//! Request-level errors (`StateMismatch`, `TokenExchange`, `InvalidDate`, ...)
//! abort the request and are rendered as an error page. Per-item errors
//! (`ListPage`, `DetailFetch`, `Cache*`, `Decode`) are logged and skipped by
//! the route aggregator and never reach a response.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("OAuth state verification failed")]
    StateMismatch,

    #[error("Could not exchange OAuth code for a token: {0}")]
    TokenExchange(String),

    #[error("Authorization denied by Strava: {0}")]
    AuthorizationDenied(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Failed to list activities (page {page}): {message}")]
    ListPage { page: u32, message: String },

    #[error("Failed to fetch activity {activity_id}: {message}")]
    DetailFetch { activity_id: u64, message: String },

    #[error("Failed to read cached polyline for activity {activity_id}: {source}")]
    CacheRead {
        activity_id: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cached polyline for activity {activity_id}: {source}")]
    CacheWrite {
        activity_id: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode polyline: {0}")]
    Decode(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message used when Strava answers 429.
    pub const STRAVA_RATE_LIMIT: &'static str = "Strava rate limit exceeded";
    /// Message used when Strava answers 401.
    pub const STRAVA_TOKEN_ERROR: &'static str = "Strava rejected the access token";

    /// True for errors that the aggregator logs and skips.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            AppError::ListPage { .. }
                | AppError::DetailFetch { .. }
                | AppError::CacheRead { .. }
                | AppError::CacheWrite { .. }
                | AppError::Decode(_)
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::StateMismatch
            | AppError::AuthorizationDenied(_)
            | AppError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            AppError::ListPage { .. } | AppError::DetailFetch { .. } => StatusCode::BAD_GATEWAY,
            AppError::TokenExchange(_)
            | AppError::CacheRead { .. }
            | AppError::CacheWrite { .. }
            | AppError::Decode(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side details stay in the logs.
        let message = match &self {
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "internal error".to_string()
            }
            AppError::TokenExchange(msg) => {
                tracing::error!(error = %msg, "Token exchange failed");
                self.to_string()
            }
            _ => {
                tracing::warn!(error = %self, status = status.as_u16(), "Request failed");
                self.to_string()
            }
        };

        let page = ErrorPage {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            message: &message,
        };

        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, message).into_response()
            }
        }
    }
}

/// Error page shown for request-level failures.
#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    code: u16,
    reason: &'a str,
    message: &'a str,
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
