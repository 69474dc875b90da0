// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth flow and the operator session.
//!
//! The app serves a single operator. `Session` holds the one access token
//! and the authorization nonces that are still waiting for a callback; the
//! last successful login wins. Supporting several browsers would mean
//! keying sessions by a cookie instead of holding one in `AppState`.

use crate::error::AppError;
use crate::services::StravaClient;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

/// How long an issued authorization nonce stays valid.
const STATE_TTL: Duration = Duration::from_secs(10 * 60);

/// Operator session: bearer token plus pending authorization nonces.
pub struct Session {
    access_token: RwLock<Option<String>>,
    pending_states: DashMap<String, Instant>,
    state_ttl: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_state_ttl(STATE_TTL)
    }

    /// Session whose nonces expire after `state_ttl`.
    pub fn with_state_ttl(state_ttl: Duration) -> Self {
        Self {
            access_token: RwLock::new(None),
            pending_states: DashMap::new(),
            state_ttl,
        }
    }

    /// Current access token, if the operator has logged in.
    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Store a new access token, replacing any previous one.
    pub async fn set_access_token(&self, token: String) {
        *self.access_token.write().await = Some(token);
    }

    /// Issue a fresh nonce for one authorization attempt.
    pub fn issue_state(&self) -> String {
        let ttl = self.state_ttl;
        self.pending_states
            .retain(|_, issued| issued.elapsed() <= ttl);

        let state = uuid::Uuid::new_v4().to_string();
        self.pending_states.insert(state.clone(), Instant::now());
        state
    }

    /// Check a nonce echoed by the callback and consume it.
    ///
    /// Returns false for unknown, already used or expired nonces.
    pub fn consume_state(&self, state: &str) -> bool {
        let matched = self
            .pending_states
            .iter()
            .find(|entry| bool::from(entry.key().as_bytes().ct_eq(state.as_bytes())))
            .map(|entry| entry.key().clone());

        let Some(key) = matched else {
            return false;
        };

        match self.pending_states.remove(&key) {
            Some((_, issued)) => issued.elapsed() <= self.state_ttl,
            None => false,
        }
    }

    /// Number of nonces still waiting for a callback.
    pub fn pending_states(&self) -> usize {
        self.pending_states.len()
    }
}

/// Drives the three-legged Strava authorization.
#[derive(Clone)]
pub struct OAuthCoordinator {
    strava: StravaClient,
    session: Arc<Session>,
    redirect_uri: String,
}

impl OAuthCoordinator {
    pub fn new(strava: StravaClient, session: Arc<Session>, redirect_uri: String) -> Self {
        Self {
            strava,
            session,
            redirect_uri,
        }
    }

    /// Authorization URL bound to a freshly issued nonce.
    pub fn authorization_url(&self) -> String {
        let state = self.session.issue_state();
        self.strava.authorize_url(&self.redirect_uri, &state)
    }

    /// Complete the flow from the callback parameters.
    ///
    /// The nonce is checked before anything else; a mismatch never reaches
    /// the token endpoint. On success the token is stored in the session.
    pub async fn complete(
        &self,
        code: Option<&str>,
        state: &str,
        error: Option<&str>,
    ) -> Result<(), AppError> {
        if !self.session.consume_state(state) {
            tracing::warn!("OAuth state mismatch, rejecting callback");
            return Err(AppError::StateMismatch);
        }

        if let Some(error) = error {
            return Err(AppError::AuthorizationDenied(error.to_string()));
        }

        let code = code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::AuthorizationDenied("no authorization code".to_string()))?;

        tracing::info!("Exchanging authorization code for token");
        let token = self.strava.exchange_code(code).await?;

        if let Some(athlete) = &token.athlete {
            tracing::info!(
                athlete_id = athlete.id,
                firstname = athlete.firstname.as_deref().unwrap_or(""),
                "OAuth successful"
            );
        }

        self.session.set_access_token(token.access_token).await;
        Ok(())
    }
}
