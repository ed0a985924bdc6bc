use crate::feeds::Trend;
use serde::{Deserialize, Serialize};

/// One element of the `trends/place` response array.
#[derive(Debug, Deserialize)]
pub struct PlaceTrends {
    pub trends: Vec<ApiTrend>,
    #[serde(default)]
    pub as_of: Option<String>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

#[derive(Debug, Deserialize)]
pub struct Location {
    pub name: String,
    pub woeid: u64,
}

#[derive(Debug, Deserialize)]
pub struct ApiTrend {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub tweet_volume: Option<u64>,
}

impl From<ApiTrend> for Trend {
    fn from(t: ApiTrend) -> Self {
        Trend {
            name: t.name,
            volume: t.tweet_volume,
            url: t.url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatePostRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostResponse {
    pub data: Option<CreatedPost>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedPost {
    pub id: String,
    pub text: String,
}

/// Error body shared by v1.1 (`errors`) and v2 (`detail`/`title`) endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable message, falling back to the raw body.
    pub fn message_or(&self, raw: &str) -> String {
        if let Some(detail) = &self.detail {
            return detail.clone();
        }
        if let Some(msg) = self.errors.iter().find_map(|e| e.message.clone()) {
            return msg;
        }
        if let Some(title) = &self.title {
            return title.clone();
        }
        raw.trim().to_string()
    }
}
