//! Fetch → compose → publish, one pass per run.

use crate::compose::{today_in, ComposedPost, PostComposer};
use crate::config::Config;
use crate::error::BotError;
use crate::feeds::{PostPublisher, TrendService, TrendSource};
use crate::twitter::XClient;
use chrono::NaiveDate;
use chrono_tz::Tz;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{error, info, warn};

/// How a run ended. Only `Published` and `DryRun` count as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Published(ComposedPost),
    DryRun(ComposedPost),
    NoTrendsFound,
    CompositionFailed,
    PublishFailed(String),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Published(_) | RunOutcome::DryRun(_))
    }

    pub fn post(&self) -> Option<&ComposedPost> {
        match self {
            RunOutcome::Published(post) | RunOutcome::DryRun(post) => Some(post),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BotSettings {
    pub max_trends: usize,
    pub max_length: usize,
    pub dry_run: bool,
    pub timezone: Tz,
}

impl BotSettings {
    pub fn from_config(config: &Config) -> Result<Self, BotError> {
        Ok(Self {
            max_trends: config.bot.max_trends,
            max_length: config.bot.max_length,
            dry_run: config.bot.dry_run,
            timezone: config.timezone()?,
        })
    }
}

pub struct TrendBot<S, P> {
    trends: TrendService<S>,
    composer: PostComposer,
    publisher: P,
    settings: BotSettings,
    rng: StdRng,
    date: Option<NaiveDate>,
}

impl<S: TrendSource, P: PostPublisher> TrendBot<S, P> {
    pub fn new(
        trends: TrendService<S>,
        composer: PostComposer,
        publisher: P,
        settings: BotSettings,
    ) -> Self {
        Self {
            trends,
            composer,
            publisher,
            settings,
            rng: StdRng::from_os_rng(),
            date: None,
        }
    }

    /// Replaces the random source used for template and emoji picks.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Pins the date used for the hashtag instead of today.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub async fn run(&mut self) -> RunOutcome {
        info!(
            max_trends = self.settings.max_trends,
            dry_run = self.settings.dry_run,
            "step 1: fetching trends"
        );
        let trends = self
            .trends
            .top_investment_trends(self.settings.max_trends)
            .await;

        if trends.is_empty() {
            warn!("no investment trends found");
            return RunOutcome::NoTrendsFound;
        }
        info!(count = trends.len(), "investment trends fetched");

        info!("step 2: composing post");
        let date = self
            .date
            .unwrap_or_else(|| today_in(self.settings.timezone));
        let Some(post) =
            self.composer
                .compose(&trends, self.settings.max_length, date, &mut self.rng)
        else {
            error!(
                max_length = self.settings.max_length,
                "no post fit within the length limit"
            );
            return RunOutcome::CompositionFailed;
        };
        info!(length = post.length, text = %post.text, "post composed");

        if self.settings.dry_run {
            info!("dry run: skipping publish");
            return RunOutcome::DryRun(post);
        }

        info!("step 3: publishing");
        match self.publisher.publish(&post.text).await {
            Ok(true) => {
                info!("post published");
                RunOutcome::Published(post)
            }
            Ok(false) => {
                error!("publisher did not accept the post");
                RunOutcome::PublishFailed("post was not accepted".to_string())
            }
            Err(e) => {
                error!(error = %e, "publish failed");
                RunOutcome::PublishFailed(e.to_string())
            }
        }
    }
}

/// Validates `config`, wires the X client into a bot and runs it once.
///
/// Only configuration problems are returned as errors; every other way a
/// run can go wrong is a [`RunOutcome`].
pub async fn run(config: &Config) -> Result<RunOutcome, BotError> {
    config.validate()?;
    info!("configuration validated");

    let settings = BotSettings::from_config(config)?;
    let client = Arc::new(
        XClient::new(config.credentials()?)?
            .with_api_base(config.bot.api_base.as_str())
            .with_max_length(settings.max_length),
    );

    let service = TrendService::new(Arc::clone(&client), config.keyword_set(), config.bot.region);
    let composer = PostComposer::new(config.post_style());
    let mut bot = TrendBot::new(service, composer, client, settings);

    Ok(bot.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::PostStyle;
    use crate::feeds::{KeywordSet, RegionId, Trend};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeSource(Vec<Trend>);

    #[async_trait]
    impl TrendSource for FakeSource {
        async fn trending_topics(&self, _region: RegionId) -> Result<Vec<Trend>, BotError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        calls: AtomicUsize,
        posted: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl PostPublisher for RecordingPublisher {
        async fn publish(&self, text: &str) -> Result<bool, BotError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.posted.lock().unwrap().push(text.to_string());
            if self.fail {
                Err(BotError::ContentRejected("duplicate content".into()))
            } else {
                Ok(true)
            }
        }
    }

    fn settings(dry_run: bool) -> BotSettings {
        BotSettings {
            max_trends: 5,
            max_length: 280,
            dry_run,
            timezone: chrono_tz::Asia::Tokyo,
        }
    }

    fn market_trends() -> Vec<Trend> {
        vec![
            Trend::new("ビットコイン", Some(12450)),
            Trend::new("日経平均", Some(8230)),
            Trend::new("天気", Some(99999)),
            Trend::new("円安", Some(15680)),
        ]
    }

    fn bot(
        trends: Vec<Trend>,
        publisher: Arc<RecordingPublisher>,
        settings: BotSettings,
    ) -> TrendBot<FakeSource, Arc<RecordingPublisher>> {
        let service = TrendService::new(FakeSource(trends), KeywordSet::investment(), RegionId::default());
        TrendBot::new(service, PostComposer::default(), publisher, settings)
            .with_rng(StdRng::seed_from_u64(11))
            .with_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    #[tokio::test]
    async fn test_run_publishes() {
        let publisher = Arc::new(RecordingPublisher::default());
        let outcome = bot(market_trends(), publisher.clone(), settings(false)).run().await;

        assert!(outcome.is_success());
        assert!(matches!(outcome, RunOutcome::Published(_)));
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 1);

        let posted = publisher.posted.lock().unwrap();
        assert!(posted[0].contains("円安"));
        assert!(posted[0].contains("#0615"));
        assert!(!posted[0].contains("天気"));
        assert_eq!(Some(posted[0].as_str()), outcome.post().map(|p| p.text.as_str()));
    }

    #[tokio::test]
    async fn test_run_without_trends_never_publishes() {
        let publisher = Arc::new(RecordingPublisher::default());
        let outcome = bot(Vec::new(), publisher.clone(), settings(false)).run().await;

        assert_eq!(outcome, RunOutcome::NoTrendsFound);
        assert!(!outcome.is_success());
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_dry_run_skips_publisher() {
        let publisher = Arc::new(RecordingPublisher::default());
        let outcome = bot(market_trends(), publisher.clone(), settings(true)).run().await;

        assert!(outcome.is_success());
        assert!(matches!(outcome, RunOutcome::DryRun(_)));
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_composition_failed() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut tight = settings(false);
        tight.max_length = 5;
        let outcome = bot(market_trends(), publisher.clone(), tight).run().await;

        assert_eq!(outcome, RunOutcome::CompositionFailed);
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_publish_error_is_reported() {
        let publisher = Arc::new(RecordingPublisher {
            fail: true,
            ..Default::default()
        });
        let outcome = bot(market_trends(), publisher.clone(), settings(false)).run().await;

        assert_eq!(
            outcome,
            RunOutcome::PublishFailed("Content rejected: duplicate content".to_string())
        );
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_respects_max_trends() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut one = settings(false);
        one.max_trends = 1;
        let outcome = bot(market_trends(), publisher, one).run().await;

        let text = &outcome.post().unwrap().text;
        assert!(text.contains("円安"));
        assert!(!text.contains("ビットコイン"));
    }

    #[tokio::test]
    async fn test_custom_style_flows_through() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = TrendService::new(
            FakeSource(market_trends()),
            KeywordSet::investment(),
            RegionId::default(),
        );
        let composer = PostComposer::new(PostStyle {
            templates: vec!["{trends} #{timestamp}".to_string()],
            emojis: vec!["-".to_string()],
        });
        let mut bot = TrendBot::new(service, composer, publisher, settings(true))
            .with_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        let outcome = bot.run().await;
        assert_eq!(
            outcome.post().unwrap().text,
            "- 円安 (15,680ツイート)\n- ビットコイン (12,450ツイート)\n- 日経平均 (8,230ツイート) #0102"
        );
    }

    #[tokio::test]
    async fn test_run_rejects_missing_credentials() {
        let err = run(&Config::default()).await.unwrap_err();
        assert!(matches!(err, BotError::InvalidConfiguration(_)));
    }
}
