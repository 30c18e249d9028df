use thiserror::Error;

/// Rejections of user-supplied parameters, raised before any feed is fetched
/// or any probability is computed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("cloud cover {0} is outside [0, 100]")]
    CloudCoverOutOfRange(f64),
}
