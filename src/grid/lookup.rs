//! Nearest-cell lookup against the OVATION probability map.

use crate::grid::error::GridLookupError;
use crate::types::grid::OvationGrid;
use crate::utils::round_half_even;
use serde::Serialize;

/// Grid longitudes are stored shifted into `0..=359` to avoid negative keys.
const LON_SHIFT: i32 = 180;

/// Outcome of a grid lookup: the matched cell plus the rounded query
/// coordinates. Returning both makes grid sparsity visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridMatch {
    pub probability: i32,
    pub lat: i32,
    pub lon: i32,
    pub grid_lat: i32,
    pub grid_lon: i32,
}

/// Finds the grid cell covering `lat`/`lon`.
///
/// Coordinates are rounded half-to-even before matching, so `.5` boundaries
/// land on the same cells the upstream map was built around. The first entry
/// in feed order with an exactly equal (shifted longitude, latitude) pair
/// wins; a missing cell is a [`GridLookupError::NotFound`].
pub fn nearest(lat: f64, lon: f64, grid: &OvationGrid) -> Result<GridMatch, GridLookupError> {
    let rounded_lat = round_half_even(lat);
    let rounded_lon = round_half_even(lon);
    let shifted_lon = rounded_lon + LON_SHIFT;

    grid.coordinates
        .iter()
        .find(|cell| cell[0] == shifted_lon && cell[1] == rounded_lat)
        .map(|cell| GridMatch {
            probability: cell[2],
            lat: rounded_lat,
            lon: rounded_lon,
            grid_lat: cell[1],
            grid_lon: cell[0],
        })
        .ok_or(GridLookupError::NotFound {
            lat: rounded_lat,
            lon: rounded_lon,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn grid(coordinates: Vec<[i32; 3]>) -> OvationGrid {
        OvationGrid {
            observation_time: Utc.with_ymd_and_hms(2025, 1, 11, 15, 6, 0).unwrap(),
            forecast_time: Utc.with_ymd_and_hms(2025, 1, 11, 16, 6, 0).unwrap(),
            format: "[Longitude, Latitude, Aurora]".to_string(),
            coordinates,
        }
    }

    #[test]
    fn test_moscow_query_matches_expected_cell() {
        let grid = grid(vec![[216, 54, 3], [217, 55, 4], [218, 56, 5]]);

        let matched = nearest(55.75, 37.62, &grid).unwrap();

        assert_eq!(matched.probability, 5);
        assert_eq!(matched.lat, 56);
        assert_eq!(matched.lon, 38);
        assert_eq!(matched.grid_lat, 56);
        assert_eq!(matched.grid_lon, 218);
    }

    #[test]
    fn test_half_degree_queries_use_bankers_rounding() {
        let grid = grid(vec![[180, 54, 7], [180, 56, 9]]);

        // 54.5 rounds down to the even 54; 55.5 rounds up to the even 56.
        assert_eq!(nearest(54.5, 0.0, &grid).unwrap().probability, 7);
        assert_eq!(nearest(55.5, 0.0, &grid).unwrap().probability, 9);
    }

    #[test]
    fn test_missing_cell_is_not_found() {
        let grid = grid(vec![[216, 54, 3]]);

        let err = nearest(10.0, 10.0, &grid).unwrap_err();
        let GridLookupError::NotFound { lat, lon } = err;
        assert_eq!(lat, 10);
        assert_eq!(lon, 10);
    }

    #[test]
    fn test_empty_grid_is_not_found() {
        let grid = grid(Vec::new());
        assert!(nearest(0.0, 0.0, &grid).is_err());
    }

    #[test]
    fn test_first_matching_entry_wins_on_duplicates() {
        let grid = grid(vec![[218, 56, 5], [218, 56, 99]]);
        assert_eq!(nearest(56.0, 38.0, &grid).unwrap().probability, 5);
    }

    #[test]
    fn test_negative_longitudes_shift_into_grid_range() {
        let grid = grid(vec![[107, -33, 2]]);

        let matched = nearest(-33.4, -73.1, &grid).unwrap();
        assert_eq!(matched.lon, -73);
        assert_eq!(matched.grid_lon, 107);
        assert_eq!(matched.probability, 2);
    }
}
