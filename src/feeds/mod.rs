pub mod keywords;
pub mod ranking;
pub mod trends;

use crate::error::BotError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use keywords::{matches, KeywordSet};
pub use ranking::{parse_limit, rank};
pub use trends::TrendService;

/// Where On Earth ID for Japan.
pub const JAPAN_WOEID: u64 = 23424856;

/// Opaque identifier selecting which regional trend list to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u64);

impl Default for RegionId {
    fn default() -> Self {
        Self(JAPAN_WOEID)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A topic currently popular in a region.
///
/// `volume` is `None` when the platform did not report a post count, which
/// is not the same thing as a count of zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trend {
    pub name: String,
    pub volume: Option<u64>,
    pub url: Option<String>,
}

impl Trend {
    pub fn new(name: impl Into<String>, volume: Option<u64>) -> Self {
        Self {
            name: name.into(),
            volume,
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Volume used for ordering; unknown counts rank as zero.
    pub fn effective_volume(&self) -> u64 {
        self.volume.unwrap_or(0)
    }
}

/// Capability to list the trending topics of a region.
#[async_trait]
pub trait TrendSource: Send + Sync {
    async fn trending_topics(&self, region: RegionId) -> Result<Vec<Trend>, BotError>;
}

/// Capability to publish a text post. `Ok(false)` means the platform
/// answered but did not accept the post.
#[async_trait]
pub trait PostPublisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<bool, BotError>;
}

#[async_trait]
impl<T: TrendSource + ?Sized> TrendSource for Arc<T> {
    async fn trending_topics(&self, region: RegionId) -> Result<Vec<Trend>, BotError> {
        (**self).trending_topics(region).await
    }
}

#[async_trait]
impl<T: PostPublisher + ?Sized> PostPublisher for Arc<T> {
    async fn publish(&self, text: &str) -> Result<bool, BotError> {
        (**self).publish(text).await
    }
}
