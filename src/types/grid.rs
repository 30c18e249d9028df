//! The OVATION aurora probability map as published by SWPC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One forecast cycle of the OVATION aurora model: a probability sample for
/// integer (longitude, latitude) cells covering the globe.
///
/// Longitudes arrive shifted by +180 into `0..=359` so the map carries no
/// negative keys. Probabilities are percentages. Entries are not guaranteed
/// unique or complete; lookups treat the first match in feed order as
/// authoritative.
///
/// The feed spells its keys `"Observation Time"`, `"Forecast Time"`, and
/// `"Data Format"`; serialization back out uses the field names below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvationGrid {
    #[serde(rename(deserialize = "Observation Time"))]
    pub observation_time: DateTime<Utc>,
    #[serde(rename(deserialize = "Forecast Time"))]
    pub forecast_time: DateTime<Utc>,
    #[serde(rename(deserialize = "Data Format"))]
    pub format: String,
    /// `[shifted longitude, latitude, probability]` triples in feed order.
    pub coordinates: Vec<[i32; 3]>,
}
