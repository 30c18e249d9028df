mod auroracast;
mod error;
mod feed;
mod forecast;
mod grid;
mod model;
mod types;
mod utils;

pub use auroracast::*;
pub use error::AuroracastError;

pub use feed::cache::FeedCache;
pub use feed::error::FeedError;
pub use feed::swpc::Feed;

pub use forecast::error::ForecastError;
pub use forecast::kp27::*;
pub use forecast::kp3::*;

pub use grid::error::GridLookupError;
pub use grid::lookup::*;

pub use model::error::ValidationError;
pub use model::probability::*;

pub use types::grid::*;
pub use types::reading::*;
