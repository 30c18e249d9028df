//! This module provides the main entry point for estimating aurora
//! visibility. An [`Auroracast`] client fetches the NOAA SWPC space weather
//! feeds it needs on demand, caches them with feed-appropriate lifetimes, and
//! exposes the probability model, grid lookup, and forecast tables.

use crate::error::AuroracastError;
use crate::feed::swpc::SwpcFeeds;
use crate::forecast::kp27::{parse_kp_27_outlook, Kp27Row};
use crate::forecast::kp3::{parse_kp_3_forecast, Kp3Column};
use crate::grid::lookup::{nearest, GridMatch};
use crate::model::probability::{
    aurora_probability, AuroraInput, ProbabilityBreakdown, DEFAULT_CLOUD_COVER, DEFAULT_WIND_SPEED,
};
use bon::bon;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second
/// (index 1). Both values are decimal degrees as `f64`.
///
/// # Examples
///
/// ```
/// use auroracast::LatLon;
///
/// let murmansk = LatLon(68.9792, 33.0925);
/// assert_eq!(murmansk.0, 68.9792); // Latitude
/// assert_eq!(murmansk.1, 33.0925); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// The main client for estimating aurora visibility from SWPC feeds.
///
/// Owns the HTTP client and the two feed caches (hourly for the index
/// readings and the OVATION grid, daily for the two text products), so
/// repeated requests within a cache lifetime never refetch upstream. The
/// client is cheap to share behind a reference: every operation takes
/// `&self` and concurrent calls coordinate through the caches.
///
/// # Examples
///
/// ```rust
/// # use auroracast::{Auroracast, AuroracastError};
/// # fn run() -> Result<(), AuroracastError> {
/// let client = Auroracast::new()?;
/// // ... use client to estimate probabilities or fetch forecast tables ...
/// # Ok(())
/// # }
/// ```
pub struct Auroracast {
    feeds: SwpcFeeds,
}

#[bon]
impl Auroracast {
    /// Creates a client with a default HTTP client (10 second request
    /// timeout on every upstream fetch).
    ///
    /// # Errors
    ///
    /// Returns [`AuroracastError::HttpClient`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, AuroracastError> {
        let client = SwpcFeeds::default_client().map_err(AuroracastError::HttpClient)?;
        Ok(Self::with_client(client))
    }

    /// Creates a client around a caller-configured `reqwest::Client`.
    ///
    /// The supplied client should carry a request timeout; upstream fetches
    /// are bounded only by what the HTTP client enforces.
    pub fn with_client(client: Client) -> Self {
        Self {
            feeds: SwpcFeeds::new(client),
        }
    }

    /// Estimates the probability of visible aurora at a location and local
    /// time, returning the full weight breakdown.
    ///
    /// Fetches the current Dst, Bz, and Kp readings (through the hourly
    /// cache) and runs the multi-factor model. Input validation happens
    /// before any feed is touched.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** Observer coordinates; latitude
    ///   must lie in [-90, 90] and longitude in [-180, 180].
    /// * `.local_time(DateTime<FixedOffset>)`: **Required.** The observer's
    ///   wall-clock time; the UTC offset determines the local hour the model
    ///   weighs darkness by.
    /// * `.wind_speed(f64)`: Optional. Solar wind speed in km/s. Defaults to
    ///   `450.0`.
    /// * `.cloud_cover(f64)`: Optional. Cloud cover percentage in [0, 100].
    ///   Defaults to `30.0`.
    ///
    /// # Errors
    ///
    /// Returns [`AuroracastError::Validation`] for out-of-range inputs and
    /// [`AuroracastError::Feed`] when an index feed cannot be fetched or
    /// decoded.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use auroracast::{Auroracast, AuroracastError, LatLon};
    /// use chrono::DateTime;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), AuroracastError> {
    /// let client = Auroracast::new()?;
    ///
    /// let breakdown = client
    ///     .aurora_probability()
    ///     .location(LatLon(68.9792, 33.0925)) // Murmansk
    ///     .local_time(DateTime::parse_from_rfc3339("2025-03-01T23:00:00+03:00").unwrap())
    ///     .cloud_cover(10.0)
    ///     .call()
    ///     .await?;
    ///
    /// println!(
    ///     "probability {:.0}% (base {}, clouds weight {})",
    ///     breakdown.probability, breakdown.base_probability, breakdown.clouds_weight
    /// );
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn aurora_probability(
        &self,
        location: LatLon,
        local_time: DateTime<FixedOffset>,
        wind_speed: Option<f64>,
        cloud_cover: Option<f64>,
    ) -> Result<ProbabilityBreakdown, AuroracastError> {
        let input = AuroraInput::new(
            local_time,
            location.0,
            location.1,
            wind_speed.unwrap_or(DEFAULT_WIND_SPEED),
            cloud_cover.unwrap_or(DEFAULT_CLOUD_COVER),
        )?;

        let (dst, bz, kp) = tokio::try_join!(
            self.feeds.latest_dst(),
            self.feeds.latest_bz(),
            self.feeds.latest_kp(),
        )?;

        Ok(aurora_probability(&input, &dst, &bz, &kp))
    }

    /// Looks up the OVATION grid cell covering a location.
    ///
    /// Fetches the current grid (through the hourly cache), rounds the
    /// coordinates half-to-even, and returns the matched cell alongside the
    /// rounded query coordinates.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** Query coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`AuroracastError::Grid`] if the rounded coordinates have no
    /// cell in the fetched grid, and [`AuroracastError::Feed`] when the grid
    /// feed cannot be fetched or decoded.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use auroracast::{Auroracast, AuroracastError, LatLon};
    /// #
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), AuroracastError> {
    /// let client = Auroracast::new()?;
    ///
    /// let matched = client
    ///     .grid_probability()
    ///     .location(LatLon(55.75, 37.62)) // Moscow
    ///     .call()
    ///     .await?;
    ///
    /// println!(
    ///     "cell ({}, {}) -> {}%",
    ///     matched.grid_lat, matched.grid_lon, matched.probability
    /// );
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn grid_probability(&self, location: LatLon) -> Result<GridMatch, AuroracastError> {
        let grid = self.feeds.aurora_grid().await?;
        Ok(nearest(location.0, location.1, &grid)?)
    }

    /// Fetches and parses the 3-day Kp forecast: one column per date, eight
    /// 3-hour buckets each, in source order.
    ///
    /// The text product is reissued daily and cached accordingly.
    ///
    /// # Errors
    ///
    /// Returns [`AuroracastError::Feed`] for fetch failures and
    /// [`AuroracastError::Forecast`] when the report's table is structurally
    /// broken.
    pub async fn kp_3_day_forecast(&self) -> Result<Vec<Kp3Column>, AuroracastError> {
        let text = self.feeds.three_day_forecast_text().await?;
        Ok(parse_kp_3_forecast(&text)?)
    }

    /// Fetches and parses the 27-day outlook: one row per day with radio
    /// flux, planetary A index, and largest expected Kp.
    ///
    /// The text product is reissued daily and cached accordingly.
    ///
    /// # Errors
    ///
    /// Returns [`AuroracastError::Feed`] for fetch failures and
    /// [`AuroracastError::Forecast`] for malformed rows.
    pub async fn kp_27_day_outlook(&self) -> Result<Vec<Kp27Row>, AuroracastError> {
        let text = self.feeds.twenty_seven_day_outlook_text().await?;
        Ok(parse_kp_27_outlook(&text)?)
    }

    /// Drops every cached feed payload immediately; the next request for each
    /// feed refetches upstream. Idempotent.
    pub async fn clear_caches(&self) {
        self.feeds.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_construction_and_cache_clear() {
        let client = Auroracast::new().expect("default client");
        client.clear_caches().await;
        client.clear_caches().await;
    }

    #[tokio::test]
    async fn test_out_of_range_input_is_rejected_before_any_fetch() {
        let client = Auroracast::new().expect("default client");

        // An invalid latitude must fail fast; no feed is touched, so this
        // cannot hang on the network.
        let result = client
            .aurora_probability()
            .location(LatLon(120.0, 0.0))
            .local_time(DateTime::parse_from_rfc3339("2025-03-01T23:00:00+03:00").unwrap())
            .call()
            .await;

        assert!(matches!(result, Err(AuroracastError::Validation(_))));
    }
}
