// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The three credentials (Strava client ID, Strava client secret and the
//! Mapbox token) are not validated at startup. A missing value is logged and
//! left empty; the failure surfaces later as a Strava or map tile error.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Mapbox access token for map tiles
    pub mapbox_token: String,
    /// Server port
    pub port: u16,
    /// Externally visible base URL, used to build the OAuth redirect URI
    pub public_url: String,
    /// Directory holding one cached polyline per activity
    pub cache_dir: PathBuf,
    /// Date range used after a successful login (DD/MM/YYYY)
    pub default_after: String,
    pub default_before: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            mapbox_token: "test_mapbox_token".to_string(),
            port: 8888,
            public_url: "http://localhost:8888".to_string(),
            cache_dir: PathBuf::from("cache"),
            default_after: "30/01/2018".to_string(),
            default_before: "30/09/2019".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT", v.clone()))?,
            Err(_) => 8888,
        };

        Ok(Self {
            strava_client_id: credential("STRAVA_CLIENT_ID"),
            strava_client_secret: credential("STRAVA_CLIENT_SECRET"),
            mapbox_token: credential("MAPBOX_TOKEN"),
            port,
            public_url: env::var("PUBLIC_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            cache_dir: env::var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("cache")),
            default_after: env::var("DEFAULT_AFTER").unwrap_or_else(|_| "30/01/2018".to_string()),
            default_before: env::var("DEFAULT_BEFORE")
                .unwrap_or_else(|_| "30/09/2019".to_string()),
        })
    }

    /// OAuth redirect URI registered with Strava.
    pub fn redirect_uri(&self) -> String {
        format!("{}/auth_callback", self.public_url)
    }
}

/// Read a credential, warning (not failing) when it is absent.
fn credential(name: &'static str) -> String {
    match env::var(name) {
        Ok(v) => v.trim().to_string(),
        Err(_) => {
            tracing::warn!(variable = name, "Credential not set, continuing with empty value");
            String::new()
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
