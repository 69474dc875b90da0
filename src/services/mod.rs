// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod aggregator;
pub mod cache;
pub mod oauth;
pub mod polyline;
pub mod strava;

pub use aggregator::{RouteAggregator, RouteSet, SkipReason, SkippedActivity};
pub use cache::PolylineCache;
pub use oauth::{OAuthCoordinator, Session};
pub use strava::StravaClient;
