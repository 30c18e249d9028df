//! The multi-factor aurora visibility model.
//!
//! A base probability derived from the Kp visibility zone and the observer's
//! approximate geomagnetic latitude is scaled by five weights (Bz direction,
//! solar wind speed, Dst depression, cloud cover, local darkness). The
//! computation is pure and total over validated inputs.

use crate::model::error::ValidationError;
use crate::types::reading::{BzReading, DstReading, KpReading};
use chrono::{DateTime, FixedOffset, Timelike};
use serde::Serialize;

/// Solar wind speed (km/s) assumed when the caller supplies none.
pub const DEFAULT_WIND_SPEED: f64 = 450.0;
/// Cloud cover percentage assumed when the caller supplies none.
pub const DEFAULT_CLOUD_COVER: f64 = 30.0;

/// Validated per-request observer parameters.
///
/// Construction is the validation boundary: a value of this type always
/// carries in-range coordinates and cloud cover.
#[derive(Debug, Clone, PartialEq)]
pub struct AuroraInput {
    local_time: DateTime<FixedOffset>,
    latitude: f64,
    longitude: f64,
    wind_speed: f64,
    cloud_cover: f64,
}

impl AuroraInput {
    pub fn new(
        local_time: DateTime<FixedOffset>,
        latitude: f64,
        longitude: f64,
        wind_speed: f64,
        cloud_cover: f64,
    ) -> Result<Self, ValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        if !(0.0..=100.0).contains(&cloud_cover) {
            return Err(ValidationError::CloudCoverOutOfRange(cloud_cover));
        }
        Ok(Self {
            local_time,
            latitude,
            longitude,
            wind_speed,
            cloud_cover,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Every factor of the computation, returned alongside the final value so
/// callers can see why a probability came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityBreakdown {
    pub base_probability: f64,
    pub bz_weight: f64,
    pub speed_weight: f64,
    pub dst_weight: f64,
    pub clouds_weight: f64,
    pub time_weight: f64,
    pub probability: f64,
}

/// Combines the three current index readings with the observer parameters
/// into a probability breakdown. Pure; never fails on validated inputs.
pub fn aurora_probability(
    input: &AuroraInput,
    dst: &DstReading,
    bz: &BzReading,
    kp: &KpReading,
) -> ProbabilityBreakdown {
    let geomagnetic_latitude = geomagnetic_latitude(input.latitude);
    let zone = visibility_zone(kp.kp);
    let base_probability = ((100.0 - (zone - geomagnetic_latitude)) * 10.0).max(0.0);

    let bz_weight = bz_weight(bz.bz_gse);
    let speed_weight = speed_weight(input.wind_speed);
    let dst_weight = dst_weight(dst.dst);
    let clouds_weight = clouds_weight(input.cloud_cover);
    let time_weight = time_weight(input.local_time.hour());

    let probability =
        base_probability * bz_weight * speed_weight * dst_weight * clouds_weight * time_weight;

    ProbabilityBreakdown {
        base_probability,
        bz_weight,
        speed_weight,
        dst_weight,
        clouds_weight,
        time_weight,
        probability: probability.clamp(0.0, 100.0),
    }
}

/// Placeholder for a true geomagnetic-coordinate transform.
fn geomagnetic_latitude(latitude: f64) -> f64 {
    (latitude + 5.0).min(90.0)
}

/// Equatorward visibility boundary of the auroral oval per Kp level.
/// Indices outside the 1..=9 table carry no zone.
fn visibility_zone(kp: i64) -> f64 {
    match kp {
        1 => 67.0,
        2 => 66.0,
        3 => 65.0,
        4 => 60.0,
        5 => 55.0,
        6 => 50.0,
        7 => 45.0,
        8 => 40.0,
        9 => 35.0,
        _ => 0.0,
    }
}

fn bz_weight(bz_gse: f64) -> f64 {
    if bz_gse < 0.0 {
        // Southward component: reconnection amplifies the oval.
        1.5 + bz_gse.abs() / 10.0
    } else {
        (1.0 - bz_gse / 10.0).max(0.8)
    }
}

fn speed_weight(wind_speed: f64) -> f64 {
    if wind_speed > 400.0 {
        1.0
    } else {
        0.5
    }
}

fn dst_weight(dst: f64) -> f64 {
    if dst < -50.0 {
        1.2
    } else {
        1.0
    }
}

fn clouds_weight(cloud_cover: f64) -> f64 {
    1.0 - cloud_cover / 100.0
}

/// Full weight only during the dark window 22:00..03:00 local.
fn time_weight(local_hour: u32) -> f64 {
    if local_hour >= 22 || local_hour <= 2 {
        1.0
    } else {
        0.5
    }
}
