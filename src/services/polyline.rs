// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Polyline decoding (Google encoded polyline, precision 5, as used by Strava).

use crate::error::AppError;
use geo::{Coord, LineString};

/// Strava encodes coordinates with five decimal places.
pub const PRECISION: u32 = 5;

/// Decode raw polyline bytes into `[lat, lon]` pairs.
pub fn decode(encoded: &[u8]) -> Result<Vec<[f64; 2]>, AppError> {
    let text = std::str::from_utf8(encoded)
        .map_err(|e| AppError::Decode(format!("polyline is not UTF-8: {}", e)))?;

    let line = polyline::decode_polyline(text, PRECISION)
        .map_err(|e| AppError::Decode(e.to_string()))?;

    // geo stores x = lon, y = lat
    Ok(line.0.iter().map(|c| [c.y, c.x]).collect())
}

/// Encode `[lat, lon]` pairs as a polyline string.
pub fn encode(coordinates: &[[f64; 2]]) -> Result<String, AppError> {
    let line: LineString<f64> = coordinates
        .iter()
        .map(|&[lat, lon]| Coord { x: lon, y: lat })
        .collect();

    polyline::encode_coordinates(line, PRECISION).map_err(|e| AppError::Decode(e.to_string()))
}
