//! X (Twitter) API adapter backing [`TrendSource`](crate::feeds::TrendSource)
//! and [`PostPublisher`](crate::feeds::PostPublisher).

pub mod client;
pub mod oauth;
pub mod types;

pub use client::{check_post_text, XClient, X_API_BASE};
pub use oauth::Credentials;
