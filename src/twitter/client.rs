use super::oauth::{authorization_header, Credentials, Nonce};
use super::types::{ApiErrorBody, CreatePostRequest, CreatePostResponse, PlaceTrends};
use crate::compose::{char_len, DEFAULT_MAX_LENGTH};
use crate::error::BotError;
use crate::feeds::{PostPublisher, RegionId, Trend, TrendSource};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const X_API_BASE: &str = "https://api.twitter.com";

/// Minimal X API client: regional trends (v1.1) and post creation (v2).
pub struct XClient {
    credentials: Credentials,
    api_base: String,
    max_length: usize,
    client: reqwest::Client,
}

impl XClient {
    pub fn new(credentials: Credentials) -> Result<Self, BotError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent(concat!("trendbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BotError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            api_base: X_API_BASE.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            client,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    fn authorize(
        &self,
        method: &Method,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, BotError> {
        authorization_header(
            &self.credentials,
            method.as_str(),
            url,
            params,
            &Nonce::generate(),
        )
        .map_err(|e| BotError::Authentication(format!("failed to sign request: {}", e)))
    }

    #[instrument(skip(self))]
    pub async fn fetch_place_trends(&self, region: RegionId) -> Result<Vec<Trend>, BotError> {
        let url = format!("{}/1.1/trends/place.json", self.api_base);
        let id = region.to_string();
        let params = [("id", id.as_str())];
        let auth = self.authorize(&Method::GET, &url, &params)?;

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("Authorization", auth)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &body, false));
        }

        let places: Vec<PlaceTrends> = serde_json::from_str(&body)?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| BotError::Parse("trends response contained no places".to_string()))?;

        debug!(as_of = ?place.as_of, count = place.trends.len(), "trends/place response");
        Ok(place.trends.into_iter().map(Trend::from).collect())
    }

    /// Posts `text`, refusing empty or oversized text before any request.
    #[instrument(skip(self, text), fields(length = char_len(text)))]
    pub async fn create_post(&self, text: &str) -> Result<String, BotError> {
        check_post_text(text, self.max_length)?;

        let url = format!("{}/2/tweets", self.api_base);
        let auth = self.authorize(&Method::POST, &url, &[])?;

        let response = self
            .client
            .post(&url)
            .header("Authorization", auth)
            .json(&CreatePostRequest { text })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &body, true));
        }

        let created: CreatePostResponse = serde_json::from_str(&body)?;
        let post = created
            .data
            .ok_or_else(|| BotError::Parse("create post response had no data".to_string()))?;

        info!(id = %post.id, "post created");
        Ok(post.id)
    }
}

/// Local guard run before publishing.
pub fn check_post_text(text: &str, max_length: usize) -> Result<(), BotError> {
    if text.trim().is_empty() {
        return Err(BotError::ContentRejected("post text is empty".to_string()));
    }
    let length = char_len(text);
    if length > max_length {
        return Err(BotError::ContentRejected(format!(
            "post is {} characters, limit is {}",
            length, max_length
        )));
    }
    Ok(())
}

fn status_error(status: StatusCode, body: &str, publishing: bool) -> BotError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed.message_or(body);

    match status {
        StatusCode::UNAUTHORIZED => BotError::Authentication(message),
        StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST if publishing => {
            BotError::ContentRejected(message)
        }
        _ => BotError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl TrendSource for XClient {
    async fn trending_topics(&self, region: RegionId) -> Result<Vec<Trend>, BotError> {
        self.fetch_place_trends(region).await
    }
}

#[async_trait]
impl PostPublisher for XClient {
    async fn publish(&self, text: &str) -> Result<bool, BotError> {
        self.create_post(text).await.map(|_| true)
    }
}
