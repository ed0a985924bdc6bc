use super::{rank, KeywordSet, RegionId, Trend, TrendSource};
use tracing::{debug, error, info};

/// Fetches a region's trends and narrows them down to the top investment
/// topics. Fetch failures are absorbed here and surface as an empty list.
pub struct TrendService<S> {
    source: S,
    keywords: KeywordSet,
    region: RegionId,
}

impl<S: TrendSource> TrendService<S> {
    pub fn new(source: S, keywords: KeywordSet, region: RegionId) -> Self {
        Self {
            source,
            keywords,
            region,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    /// Raw trend list for the configured region, or empty on failure.
    pub async fn fetch_trends(&self) -> Vec<Trend> {
        match self.source.trending_topics(self.region).await {
            Ok(trends) => {
                info!(region = %self.region, count = trends.len(), "fetched trends");
                trends
            }
            Err(e) => {
                error!(region = %self.region, error = %e, "failed to fetch trends");
                Vec::new()
            }
        }
    }

    /// Keeps the trends whose name hits the keyword list, in source order.
    pub fn filter_investment_trends(&self, trends: Vec<Trend>) -> Vec<Trend> {
        let matched: Vec<Trend> = trends
            .into_iter()
            .filter(|trend| match self.keywords.first_match(&trend.name) {
                Some(keyword) => {
                    debug!(name = %trend.name, keyword, "investment trend matched");
                    true
                }
                None => false,
            })
            .collect();

        info!(count = matched.len(), "investment trends after filtering");
        matched
    }

    pub async fn top_investment_trends(&self, max_count: usize) -> Vec<Trend> {
        let all = self.fetch_trends().await;
        if all.is_empty() {
            return Vec::new();
        }

        let top = rank(self.filter_investment_trends(all), max_count);

        info!(count = top.len(), "selected top investment trends");
        for (i, trend) in top.iter().enumerate() {
            info!(
                rank = i + 1,
                name = %trend.name,
                volume = ?trend.volume,
                "top trend"
            );
        }

        top
    }
}
