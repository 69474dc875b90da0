// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for listing activities and fetching their routes.
//!
//! Handles:
//! - Paginated activity listing as a lazy stream of pages
//! - Activity detail fetching (encoded polylines)
//! - OAuth authorization URLs and code exchange
//! - Rate limit / rejected token detection

use crate::error::AppError;
use crate::models::{ActivityDetail, ActivitySummary};
use futures_util::stream::{self, Stream};
use serde::Deserialize;

/// Strava returns at most 200 activities per page.
pub const PAGE_SIZE: u32 = 200;

const STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
const STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth";

/// Scope needed to read private activities and their maps.
const OAUTH_SCOPE: &str = "activity:read_all";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_urls(
            client_id,
            client_secret,
            STRAVA_API_URL.to_string(),
            STRAVA_OAUTH_URL.to_string(),
        )
    }

    /// Create a client talking to alternative API and OAuth endpoints.
    pub fn with_base_urls(
        client_id: String,
        client_secret: String,
        api_url: String,
        oauth_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            oauth_url: oauth_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    // ─── OAuth ───────────────────────────────────────────────────────────────

    /// Build the URL that sends the operator to Strava's consent screen.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/authorize?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             approval_prompt=auto&\
             scope={}&\
             state={}",
            self.oauth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            OAUTH_SCOPE,
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::TokenExchange(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token exchange failed");
            return Err(AppError::TokenExchange(format!(
                "token endpoint answered {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::TokenExchange(format!("failed to parse token response: {}", e)))
    }

    // ─── Activities ──────────────────────────────────────────────────────────

    /// Fetch one page of activities between two Unix timestamps.
    pub async fn list_activities_page(
        &self,
        access_token: &str,
        after: i64,
        before: i64,
        page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);
        let query = [
            ("after", after.to_string()),
            ("before", before.to_string()),
            ("page", page.to_string()),
            ("per_page", PAGE_SIZE.to_string()),
        ];

        self.get_json(&url, access_token, &query)
            .await
            .map_err(|message| AppError::ListPage { page, message })
    }

    /// Lazily page through all activities between two Unix timestamps.
    ///
    /// Each item is one page. Pages are requested starting at 1 and the
    /// stream ends at the first empty page. A failed page is yielded as
    /// `AppError::ListPage` and ends the stream. Polling the stream again
    /// after it ended does not restart pagination.
    pub fn list_activities(
        &self,
        access_token: &str,
        after: i64,
        before: i64,
    ) -> impl Stream<Item = Result<Vec<ActivitySummary>, AppError>> + Send + 'static {
        let client = self.clone();
        let access_token = access_token.to_string();

        stream::try_unfold(1u32, move |page| {
            let client = client.clone();
            let access_token = access_token.clone();
            async move {
                let batch = client
                    .list_activities_page(&access_token, after, before, page)
                    .await?;
                tracing::debug!(page, count = batch.len(), "Fetched activity page");

                let next = if batch.is_empty() {
                    None
                } else {
                    Some((batch, page + 1))
                };
                Ok::<_, AppError>(next)
            }
        })
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<ActivityDetail, AppError> {
        let url = format!("{}/activities/{}", self.api_url, activity_id);
        self.get_json(&url, access_token, &[])
            .await
            .map_err(|message| AppError::DetailFetch {
                activity_id,
                message,
            })
    }

    /// Generic GET request with JSON response.
    ///
    /// Errors are returned as messages; callers wrap them in the variant that
    /// matches the operation.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T, String> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::STRAVA_RATE_LIMIT.to_string());
            }

            if status.as_u16() == 401 {
                return Err(AppError::STRAVA_TOKEN_ERROR.to_string());
            }

            return Err(format!("HTTP {}: {}", status, body));
        }

        response
            .json()
            .await
            .map_err(|e| format!("JSON parse error: {}", e))
    }
}

/// Token exchange response from Strava OAuth.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    #[serde(default)]
    pub athlete: Option<StravaAthlete>,
}

/// Athlete info returned alongside the token.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaAthlete {
    pub id: u64,
    #[serde(default)]
    pub firstname: Option<String>,
}
