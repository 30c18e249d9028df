use crate::feed::swpc::Feed;
use thiserror::Error;

/// Failures while fetching or decoding an upstream SWPC product.
///
/// Every variant names the feed it came from. None of these are retried by
/// the core; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network request failed for the {feed} feed ({url})")]
    NetworkRequest {
        feed: Feed,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for the {feed} feed ({url}) with status {status}")]
    HttpStatus {
        feed: Feed,
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode the JSON payload of the {feed} feed")]
    JsonDecode {
        feed: Feed,
        #[source]
        source: serde_json::Error,
    },

    #[error("the {feed} feed is not valid UTF-8")]
    TextDecode {
        feed: Feed,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("the {feed} feed returned no readings")]
    EmptyFeed { feed: Feed },

    // Covers errors joining the detached fetch task
    #[error("feed fetch task failed to complete")]
    FlightJoin(#[from] tokio::task::JoinError),
}
