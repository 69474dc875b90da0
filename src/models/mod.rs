// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod date_range;

pub use activity::{ActivityDetail, ActivityMap, ActivitySummary, DecodedRoute};
pub use date_range::DateRange;
