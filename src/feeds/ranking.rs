use super::Trend;
use crate::error::BotError;
use std::cmp::Reverse;

/// Orders trends by volume, highest first, and keeps the first `limit`.
///
/// Unknown volumes sort as zero. The sort is stable, so trends with equal
/// effective volume keep the order the platform returned them in.
pub fn rank(mut trends: Vec<Trend>, limit: usize) -> Vec<Trend> {
    trends.sort_by_key(|trend| Reverse(trend.effective_volume()));
    trends.truncate(limit);
    trends
}

/// Parses a user-supplied trend limit. Negative values are rejected.
pub fn parse_limit(raw: &str) -> Result<usize, BotError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| BotError::invalid_argument(format!("limit is not an integer: {raw:?}")))?;
    usize::try_from(value)
        .map_err(|_| BotError::invalid_argument(format!("limit must be non-negative, got {value}")))
}
