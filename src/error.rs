use crate::feed::error::FeedError;
use crate::forecast::error::ForecastError;
use crate::grid::error::GridLookupError;
use crate::model::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuroracastError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Grid(#[from] GridLookupError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to construct the HTTP client")]
    HttpClient(#[source] reqwest::Error),
}
