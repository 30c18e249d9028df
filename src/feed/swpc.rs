//! Fetch layer for the NOAA SWPC products this crate consumes: the upstream
//! URL registry, per-feed cache lifetimes, and typed decoding of the raw
//! payloads.

use crate::feed::cache::FeedCache;
use crate::feed::error::FeedError;
use crate::types::grid::OvationGrid;
use crate::types::reading::{BzReading, DstReading, KpReading};
use bytes::Bytes;
use log::warn;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

const SWPC_BASE_URL: &str = "https://services.swpc.noaa.gov";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const VOLATILE_TTL: Duration = Duration::from_secs(60 * 60);
const STABLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const CACHE_CAPACITY: usize = 64;

/// Identity of one upstream SWPC product. Carried by every [`FeedError`] so
/// callers can tell which feed let them down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Dst,
    Bz,
    Kp,
    OvationGrid,
    ThreeDayForecast,
    TwentySevenDayOutlook,
}

impl Feed {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Feed::Dst => "json/geospace/geospace_dst_1_hour.json",
            Feed::Bz => "json/dscovr/dscovr_mag_1s.json",
            Feed::Kp => "json/planetary_k_index_1m.json",
            Feed::OvationGrid => "json/ovation_aurora_latest.json",
            Feed::ThreeDayForecast => "text/3-day-forecast.txt",
            Feed::TwentySevenDayOutlook => "text/27-day-outlook.txt",
        }
    }

    pub(crate) fn url(&self) -> String {
        format!("{SWPC_BASE_URL}/{}", self.path_segment())
    }

    /// The text products are reissued daily; everything else refreshes hourly.
    pub(crate) fn ttl(&self) -> Duration {
        if self.is_stable() {
            STABLE_TTL
        } else {
            VOLATILE_TTL
        }
    }

    fn is_stable(&self) -> bool {
        matches!(self, Feed::ThreeDayForecast | Feed::TwentySevenDayOutlook)
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feed::Dst => "dst",
            Feed::Bz => "bz",
            Feed::Kp => "kp",
            Feed::OvationGrid => "ovation-grid",
            Feed::ThreeDayForecast => "3-day-forecast",
            Feed::TwentySevenDayOutlook => "27-day-outlook",
        };
        write!(f, "{name}")
    }
}

/// Cached access to every SWPC feed through a shared HTTP client.
///
/// Two cache instances mirror the two upstream refresh cadences: a volatile
/// one for the index readings and the OVATION grid, and a stable one for the
/// two text products.
pub(crate) struct SwpcFeeds {
    client: Client,
    volatile: FeedCache,
    stable: FeedCache,
}

impl SwpcFeeds {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            volatile: FeedCache::new(CACHE_CAPACITY),
            stable: FeedCache::new(CACHE_CAPACITY),
        }
    }

    /// HTTP client with the fetch timeout every upstream request must carry.
    pub(crate) fn default_client() -> Result<Client, reqwest::Error> {
        Client::builder().timeout(FETCH_TIMEOUT).build()
    }

    pub(crate) async fn latest_dst(&self) -> Result<DstReading, FeedError> {
        let payload = self.fetch_cached(Feed::Dst).await?;
        decode_first(Feed::Dst, &payload)
    }

    pub(crate) async fn latest_bz(&self) -> Result<BzReading, FeedError> {
        let payload = self.fetch_cached(Feed::Bz).await?;
        decode_first(Feed::Bz, &payload)
    }

    pub(crate) async fn latest_kp(&self) -> Result<KpReading, FeedError> {
        let payload = self.fetch_cached(Feed::Kp).await?;
        decode_first(Feed::Kp, &payload)
    }

    pub(crate) async fn aurora_grid(&self) -> Result<OvationGrid, FeedError> {
        let payload = self.fetch_cached(Feed::OvationGrid).await?;
        serde_json::from_slice(&payload).map_err(|e| FeedError::JsonDecode {
            feed: Feed::OvationGrid,
            source: e,
        })
    }

    pub(crate) async fn three_day_forecast_text(&self) -> Result<String, FeedError> {
        self.feed_text(Feed::ThreeDayForecast).await
    }

    pub(crate) async fn twenty_seven_day_outlook_text(&self) -> Result<String, FeedError> {
        self.feed_text(Feed::TwentySevenDayOutlook).await
    }

    /// Drops everything from both caches. Idempotent.
    pub(crate) async fn clear(&self) {
        self.volatile.clear().await;
        self.stable.clear().await;
    }

    async fn feed_text(&self, feed: Feed) -> Result<String, FeedError> {
        let payload = self.fetch_cached(feed).await?;
        String::from_utf8(payload.to_vec()).map_err(|e| FeedError::TextDecode { feed, source: e })
    }

    async fn fetch_cached(&self, feed: Feed) -> Result<Bytes, FeedError> {
        let cache = if feed.is_stable() {
            &self.stable
        } else {
            &self.volatile
        };
        // The fetch future runs on a detached task inside the cache, so it
        // owns its client handle (a cheap clone of the shared pool).
        let client = self.client.clone();
        cache
            .get_or_fetch(feed.path_segment(), feed.ttl(), move || {
                fetch_upstream(client, feed)
            })
            .await
    }
}

async fn fetch_upstream(client: Client, feed: Feed) -> Result<Bytes, FeedError> {
    let url = feed.url();
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| FeedError::NetworkRequest {
            feed,
            url: url.clone(),
            source: e,
        })?;

    let response = match response.error_for_status() {
        Ok(response) => response,
        Err(e) => {
            warn!("HTTP error for {feed} feed at {url}: {e:?}");
            return Err(if let Some(status) = e.status() {
                FeedError::HttpStatus {
                    feed,
                    url,
                    status,
                    source: e,
                }
            } else {
                FeedError::NetworkRequest {
                    feed,
                    url,
                    source: e,
                }
            });
        }
    };

    response.bytes().await.map_err(|e| FeedError::NetworkRequest {
        feed,
        url: feed.url(),
        source: e,
    })
}

/// SWPC index feeds are JSON arrays ordered newest reading first.
fn decode_first<T: DeserializeOwned>(feed: Feed, payload: &[u8]) -> Result<T, FeedError> {
    let mut readings: Vec<T> =
        serde_json::from_slice(payload).map_err(|e| FeedError::JsonDecode { feed, source: e })?;
    if readings.is_empty() {
        return Err(FeedError::EmptyFeed { feed });
    }
    Ok(readings.remove(0))
}
