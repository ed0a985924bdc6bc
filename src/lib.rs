//! Trend bot: picks the investment-related topics out of a region's trending
//! list on X, renders them into a short post and publishes it.
//!
//! - [`feeds`]: trend model, keyword filter, ranking and the fetch service.
//! - [`compose`]: post text generation.
//! - [`twitter`]: the X API adapter.
//! - [`bot`]: the run orchestration.

pub mod bot;
pub mod compose;
pub mod config;
pub mod error;
pub mod feeds;
pub mod logging;
pub mod twitter;

pub use bot::{run, BotSettings, RunOutcome, TrendBot};
pub use compose::{compose_detailed, compose_simple, ComposedPost, PostComposer, PostStyle};
pub use config::Config;
pub use error::BotError;
pub use feeds::{KeywordSet, PostPublisher, RegionId, Trend, TrendService, TrendSource};
