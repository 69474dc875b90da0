// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity models and decoded routes.

use serde::{Deserialize, Serialize};

/// Summary activity from the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySummary {
    /// Strava activity ID
    pub id: u64,
    /// Map data (summary polyline only); absent for some manual activities
    #[serde(default)]
    pub map: Option<ActivityMap>,
}

impl ActivitySummary {
    /// True when the listing already shows there is no route to fetch.
    ///
    /// Only an explicitly empty `summary_polyline` counts; a missing map or
    /// polyline field means the detail endpoint has to be asked.
    pub fn has_no_route(&self) -> bool {
        self.map
            .as_ref()
            .and_then(|m| m.summary_polyline.as_deref())
            .is_some_and(str::is_empty)
    }
}

/// Detailed activity response.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityDetail {
    pub id: u64,
    #[serde(default)]
    pub map: ActivityMap,
}

impl ActivityDetail {
    /// Get the detailed polyline, falling back to summary if not available.
    ///
    /// Returns `None` when the activity has no recorded route.
    pub fn polyline(&self) -> Option<&str> {
        self.map
            .polyline
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.map.summary_polyline.as_deref())
            .filter(|p| !p.is_empty())
    }
}

/// Activity map data with polylines.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityMap {
    #[serde(default)]
    pub polyline: Option<String>,
    #[serde(default)]
    pub summary_polyline: Option<String>,
}

/// One activity's route as (lat, lon) pairs, ready for the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedRoute {
    pub activity_id: u64,
    pub coordinates: Vec<[f64; 2]>,
}
