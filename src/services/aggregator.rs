// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route aggregation service.
//!
//! Handles the core workflow for one map request:
//! 1. Widen the requested date range by a day on each side
//! 2. Page through the operator's activities
//! 3. Load each route from the polyline cache, or fetch and cache it
//! 4. Decode polylines into coordinates
//!
//! Everything runs sequentially, one activity at a time. Failures for a
//! single activity are logged and skipped; they never fail the request.

use crate::error::AppError;
use crate::models::{ActivitySummary, DateRange, DecodedRoute};
use crate::services::{polyline, PolylineCache, StravaClient};
use futures_util::{pin_mut, StreamExt};

/// Builds the set of decoded routes for a date range.
#[derive(Clone)]
pub struct RouteAggregator {
    strava: StravaClient,
    cache: PolylineCache,
}

/// Routes for one request, in Strava's listing order.
#[derive(Debug, Default)]
pub struct RouteSet {
    pub routes: Vec<DecodedRoute>,
    /// Activities left off the map, with the reason.
    pub skipped: Vec<SkippedActivity>,
    /// Set when listing stopped early because a page could not be fetched.
    pub listing_error: Option<String>,
}

/// An activity that did not make it onto the map.
#[derive(Debug)]
pub struct SkippedActivity {
    pub activity_id: u64,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub enum SkipReason {
    /// The activity has no recorded route.
    NoRoute,
    /// Fetching, reading or decoding failed.
    Failed(AppError),
}

impl RouteAggregator {
    pub fn new(strava: StravaClient, cache: PolylineCache) -> Self {
        Self { strava, cache }
    }

    /// Collect every decodable route for activities in `range`.
    pub async fn aggregate(&self, access_token: &str, range: &DateRange) -> RouteSet {
        let (after, before) = range.widened().to_epoch_bounds();
        let mut result = RouteSet::default();

        let activities = match self.collect_activities(access_token, after, before).await {
            (activities, None) => activities,
            (activities, Some(err)) => {
                tracing::error!(
                    error = %err,
                    listed = activities.len(),
                    "Activity listing failed, continuing with activities listed so far"
                );
                result.listing_error = Some(err.to_string());
                activities
            }
        };

        tracing::info!(count = activities.len(), "Listed activities");

        for activity in &activities {
            let activity_id = activity.id;
            match self.load_route(access_token, activity).await {
                Ok(Some(coordinates)) => result.routes.push(DecodedRoute {
                    activity_id,
                    coordinates,
                }),
                Ok(None) => {
                    tracing::debug!(activity_id, "Activity has no route, skipping");
                    result.skipped.push(SkippedActivity {
                        activity_id,
                        reason: SkipReason::NoRoute,
                    });
                }
                Err(e) => {
                    tracing::warn!(activity_id, error = %e, "Skipping activity");
                    result.skipped.push(SkippedActivity {
                        activity_id,
                        reason: SkipReason::Failed(e),
                    });
                }
            }
        }

        tracing::info!(
            routes = result.routes.len(),
            skipped = result.skipped.len(),
            "Routes aggregated"
        );
        result
    }

    /// Drain the page stream, keeping the pages that arrived before any error.
    async fn collect_activities(
        &self,
        access_token: &str,
        after: i64,
        before: i64,
    ) -> (Vec<ActivitySummary>, Option<AppError>) {
        let pages = self.strava.list_activities(access_token, after, before);
        pin_mut!(pages);

        let mut activities = Vec::new();
        while let Some(page) = pages.next().await {
            match page {
                Ok(batch) => activities.extend(batch),
                Err(e) => return (activities, Some(e)),
            }
        }
        (activities, None)
    }

    /// Coordinates for one activity, or `None` if it has no route.
    async fn load_route(
        &self,
        access_token: &str,
        activity: &ActivitySummary,
    ) -> Result<Option<Vec<[f64; 2]>>, AppError> {
        let Some(encoded) = self.load_polyline(access_token, activity).await? else {
            return Ok(None);
        };
        // An empty record is an activity without a route, wherever it came from.
        if encoded.is_empty() {
            return Ok(None);
        }
        polyline::decode(&encoded).map(Some)
    }

    /// Raw polyline bytes from the cache, falling back to Strava.
    async fn load_polyline(
        &self,
        access_token: &str,
        activity: &ActivitySummary,
    ) -> Result<Option<Vec<u8>>, AppError> {
        let activity_id = activity.id;

        if self.cache.exists(activity_id).await {
            return self.cache.read(activity_id).await.map(Some);
        }

        if activity.has_no_route() {
            return Ok(None);
        }

        let detail = self.strava.get_activity(access_token, activity_id).await?;
        let Some(polyline) = detail.polyline() else {
            return Ok(None);
        };
        let bytes = polyline.as_bytes().to_vec();

        // Best effort: the route is still drawn if caching fails.
        if let Err(e) = self.cache.write(activity_id, &bytes).await {
            tracing::warn!(activity_id, error = %e, "Could not cache polyline");
        }

        Ok(Some(bytes))
    }
}
