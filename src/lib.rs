// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plotted: draw all of your Strava routes on one map
//!
//! This crate logs the operator in with Strava, collects the encoded
//! polylines of their activities (caching them on disk) and renders the
//! decoded routes on a Mapbox-backed Leaflet map.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{OAuthCoordinator, PolylineCache, RouteAggregator, Session, StravaClient};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session: Arc<Session>,
    pub oauth: OAuthCoordinator,
    pub aggregator: RouteAggregator,
}

impl AppState {
    /// Wire the services together around one operator session.
    pub fn new(config: Config, strava: StravaClient, cache: PolylineCache) -> Self {
        let session = Arc::new(Session::new());
        let oauth = OAuthCoordinator::new(strava.clone(), session.clone(), config.redirect_uri());
        let aggregator = RouteAggregator::new(strava, cache);

        Self {
            config,
            session,
            oauth,
            aggregator,
        }
    }
}
