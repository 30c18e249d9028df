use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridLookupError {
    /// The rounded query coordinates have no cell in the fetched grid. There
    /// is no interpolation fallback; callers should treat this as "no data
    /// for this query".
    #[error("no aurora grid cell for rounded coordinates (lat {lat}, lon {lon})")]
    NotFound { lat: i32, lon: i32 },
}
