//! Post text generation.
//!
//! Three renderings are available:
//! - [`PostComposer::compose`]: random template and emojis, shrunk to fit a
//!   character budget by dropping the lowest-ranked trend and regenerating.
//! - [`compose_simple`]: fixed numbered list, deterministic.
//! - [`compose_detailed`]: single-trend announcement, deterministic.

use crate::feeds::Trend;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Slot filled with the rendered trend lines.
pub const TRENDS_SLOT: &str = "{trends}";
/// Slot filled with the month-day tag.
pub const TIMESTAMP_SLOT: &str = "{timestamp}";

/// Post length limit of the platform, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 280;

pub const DEFAULT_TEMPLATES: &[&str] = &[
    "📊 今注目の投資トレンド\n\n{trends}\n\n#投資 #トレンド #{timestamp}",
    "💰 投資家が注目しているトピック\n\n{trends}\n\n#資産運用 #投資情報 #{timestamp}",
    "🔥 いま話題の投資関連ワード\n\n{trends}\n\n#株式投資 #仮想通貨 #{timestamp}",
    "📈 投資系トレンドランキング\n\n{trends}\n\n#マーケット #投資 #{timestamp}",
    "⚡️ リアルタイム投資トレンド\n\n{trends}\n\n#金融 #投資家 #{timestamp}",
];

pub const DEFAULT_EMOJIS: &[&str] = &["📊", "💰", "📈", "💹", "🔥", "⚡️", "💎", "🚀", "📉", "💵"];

/// Entries listed by [`compose_simple`].
pub const SIMPLE_MAX_ENTRIES: usize = 5;

const SIMPLE_HEADER: &str = "📊 投資系トレンド";
const SIMPLE_FOOTER: &str = "#投資 #トレンド";
const DETAILED_FOOTER: &str = "#投資 #トレンド #マーケット";

/// Template and emoji pools a composer draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostStyle {
    pub templates: Vec<String>,
    pub emojis: Vec<String>,
}

impl Default for PostStyle {
    fn default() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES.iter().map(|s| s.to_string()).collect(),
            emojis: DEFAULT_EMOJIS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A rendered post together with its character count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPost {
    pub text: String,
    pub length: usize,
}

impl ComposedPost {
    pub fn new(text: String) -> Self {
        let length = char_len(&text);
        Self { text, length }
    }
}

pub struct PostComposer {
    style: PostStyle,
}

impl PostComposer {
    /// Empty pools fall back to the built-in ones.
    pub fn new(style: PostStyle) -> Self {
        let defaults = PostStyle::default();
        let style = PostStyle {
            templates: if style.templates.is_empty() {
                defaults.templates
            } else {
                style.templates
            },
            emojis: if style.emojis.is_empty() {
                defaults.emojis
            } else {
                style.emojis
            },
        };
        Self { style }
    }

    pub fn style(&self) -> &PostStyle {
        &self.style
    }

    /// Renders `trends` into a post no longer than `max_length` characters.
    ///
    /// While the text is too long the last (lowest-ranked) trend is dropped
    /// and the whole post is rendered again with fresh random picks. Returns
    /// `None` if `trends` is empty or nothing fits.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        trends: &[Trend],
        max_length: usize,
        date: NaiveDate,
        rng: &mut R,
    ) -> Option<ComposedPost> {
        let tag = date_tag(date);
        let mut count = trends.len();

        while count > 0 {
            let post = self.render(&trends[..count], &tag, rng);
            if post.length <= max_length {
                return Some(post);
            }
            tracing::debug!(
                length = post.length,
                max_length,
                trends = count,
                "post too long, dropping lowest-ranked trend"
            );
            count -= 1;
        }

        None
    }

    fn render<R: Rng + ?Sized>(&self, trends: &[Trend], tag: &str, rng: &mut R) -> ComposedPost {
        let lines: Vec<String> = trends
            .iter()
            .map(|trend| {
                let emoji = pick(&self.style.emojis, rng);
                trend_line(emoji, trend)
            })
            .collect();

        let template = pick(&self.style.templates, rng);
        let text = fill_template(template, &lines.join("\n"), tag);
        ComposedPost::new(text)
    }
}

impl Default for PostComposer {
    fn default() -> Self {
        Self::new(PostStyle::default())
    }
}

fn pick<'a, R: Rng + ?Sized>(pool: &'a [String], rng: &mut R) -> &'a str {
    // pools are never empty, PostComposer::new guarantees it
    pool.choose(rng).map(String::as_str).unwrap_or_default()
}

fn trend_line(emoji: &str, trend: &Trend) -> String {
    match trend.volume {
        Some(volume) => format!("{} {} ({}ツイート)", emoji, trend.name, format_count(volume)),
        None => format!("{} {}", emoji, trend.name),
    }
}

/// Substitutes the date tag first so trend names are never rescanned.
pub fn fill_template(template: &str, trends_text: &str, tag: &str) -> String {
    template
        .replace(TIMESTAMP_SLOT, tag)
        .replace(TRENDS_SLOT, trends_text)
}

/// Numbered list of the first [`SIMPLE_MAX_ENTRIES`] trends with a fixed
/// header and footer. Names are never shortened and no length limit applies.
pub fn compose_simple(trends: &[Trend]) -> Option<String> {
    if trends.is_empty() {
        return None;
    }

    let mut lines = vec![format!("{}\n", SIMPLE_HEADER)];
    for (i, trend) in trends.iter().take(SIMPLE_MAX_ENTRIES).enumerate() {
        match trend.volume {
            Some(volume) => lines.push(format!("{}. {} ({})", i + 1, trend.name, format_count(volume))),
            None => lines.push(format!("{}. {}", i + 1, trend.name)),
        }
    }
    lines.push(format!("\n{}", SIMPLE_FOOTER));

    Some(lines.join("\n"))
}

/// Announcement for a single trend.
pub fn compose_detailed(trend: &Trend) -> String {
    let mut text = match trend.volume {
        Some(volume) => format!(
            "🔥 いま話題: {}\n\n💬 {}件のツイート\n\n",
            trend.name,
            format_count(volume)
        ),
        None => format!("🔥 いま話題: {}\n\n", trend.name),
    };
    text.push_str(DETAILED_FOOTER);
    text
}

/// Formats a count with comma thousands separators, e.g. `12,450`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Month-day hashtag suffix, e.g. `0615`.
pub fn date_tag(date: NaiveDate) -> String {
    date.format("%m%d").to_string()
}

/// Today's date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Vec<Trend> {
        vec![
            Trend::new("ビットコイン", Some(12450)),
            Trend::new("日経平均", Some(8230)),
            Trend::new("円安", Some(15680)),
            Trend::new("NISA", Some(5420)),
            Trend::new("金利", None),
        ]
    }

    fn june_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn fixed_style() -> PostStyle {
        PostStyle {
            templates: vec!["T\n{trends}\n#{timestamp}".to_string()],
            emojis: vec!["*".to_string()],
        }
    }

    #[test]
    fn test_compose_empty_returns_none() {
        let composer = PostComposer::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(composer.compose(&[], 280, june_15(), &mut rng).is_none());
        assert!(composer.compose(&[], 0, june_15(), &mut rng).is_none());
    }

    #[test]
    fn test_compose_contains_all_names_and_date_tag() {
        let composer = PostComposer::default();
        let mut rng = StdRng::seed_from_u64(7);
        let post = composer.compose(&sample(), 280, june_15(), &mut rng).unwrap();

        for trend in sample() {
            assert!(post.text.contains(&trend.name), "missing {}", trend.name);
        }
        assert!(post.text.contains("#0615"));
        assert!(post.text.contains("12,450ツイート"));
        assert!(post.length <= 280);
        assert_eq!(post.length, post.text.chars().count());
    }

    #[test]
    fn test_compose_with_fixed_pools_is_exact() {
        let composer = PostComposer::new(fixed_style());
        let mut rng = StdRng::seed_from_u64(0);
        let post = composer
            .compose(&sample()[3..], 280, june_15(), &mut rng)
            .unwrap();
        assert_eq!(post.text, "T\n* NISA (5,420ツイート)\n* 金利\n#0615");
    }

    #[test]
    fn test_compose_same_seed_same_output() {
        let composer = PostComposer::default();
        let a = composer.compose(&sample(), 280, june_15(), &mut StdRng::seed_from_u64(42));
        let b = composer.compose(&sample(), 280, june_15(), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_compose_shrinks_from_the_end() {
        let composer = PostComposer::new(fixed_style());
        let full = composer
            .compose(&sample(), 1000, june_15(), &mut StdRng::seed_from_u64(0))
            .unwrap();

        let budget = full.length - 1;
        let shrunk = composer
            .compose(&sample(), budget, june_15(), &mut StdRng::seed_from_u64(0))
            .unwrap();

        assert!(shrunk.length <= budget);
        assert!(shrunk.text.contains("ビットコイン"));
        assert!(shrunk.text.contains("NISA"));
        assert!(!shrunk.text.contains("金利"));
    }

    #[test]
    fn test_compose_result_is_prefix_under_pressure() {
        let composer = PostComposer::default();
        let trends = sample();
        for max_length in [40, 60, 80, 100, 120] {
            let mut rng = StdRng::seed_from_u64(max_length as u64);
            if let Some(post) = composer.compose(&trends, max_length, june_15(), &mut rng) {
                assert!(post.length <= max_length);
                let kept: Vec<bool> = trends.iter().map(|t| post.text.contains(&t.name)).collect();
                let first_missing = kept.iter().position(|k| !k).unwrap_or(kept.len());
                assert!(kept[first_missing..].iter().all(|k| !k), "not a prefix: {:?}", kept);
                assert!(first_missing >= 1);
            }
        }
    }

    #[test]
    fn test_compose_nothing_fits() {
        let composer = PostComposer::default();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(composer.compose(&sample(), 10, june_15(), &mut rng).is_none());
    }

    #[test]
    fn test_empty_pools_fall_back_to_defaults() {
        let composer = PostComposer::new(PostStyle {
            templates: Vec::new(),
            emojis: Vec::new(),
        });
        assert_eq!(composer.style(), &PostStyle::default());
    }

    #[test]
    fn test_fill_template_does_not_rescan_trend_text() {
        let text = fill_template("{trends} #{timestamp}", "{timestamp}", "0615");
        assert_eq!(text, "{timestamp} #0615");
    }

    #[test]
    fn test_compose_simple() {
        let text = compose_simple(&sample()).unwrap();
        assert_eq!(
            text,
            "📊 投資系トレンド\n\n1. ビットコイン (12,450)\n2. 日経平均 (8,230)\n3. 円安 (15,680)\n4. NISA (5,420)\n5. 金利\n\n#投資 #トレンド"
        );
    }

    #[test]
    fn test_compose_simple_lists_first_five() {
        let trends: Vec<Trend> = (0..7).map(|i| Trend::new(format!("株{}", i), Some(i))).collect();
        let text = compose_simple(&trends).unwrap();
        assert!(text.contains("5. 株4 (4)"));
        assert!(!text.contains("6. "));
        assert!(!text.contains("株5"));
        assert!(!text.contains("株6"));
    }

    #[test]
    fn test_compose_simple_never_shortens_long_names() {
        let trends: Vec<Trend> = (0..5)
            .map(|i| {
                Trend::new(
                    format!("{}番目の長い株価関連トレンド名{}", i, "あ".repeat(60)),
                    Some(i * 1000),
                )
            })
            .collect();
        let text = compose_simple(&trends).unwrap();
        assert!(char_len(&text) > DEFAULT_MAX_LENGTH);
        for (i, trend) in trends.iter().enumerate() {
            let line = format!("{}. {} ({})", i + 1, trend.name, format_count(i as u64 * 1000));
            assert!(text.contains(&line), "missing {line}");
        }
        assert!(text.ends_with(SIMPLE_FOOTER));
    }

    #[test]
    fn test_compose_simple_empty() {
        assert!(compose_simple(&[]).is_none());
    }

    #[test]
    fn test_compose_detailed_is_deterministic() {
        let trend = Trend::new("ビットコイン", Some(12450));
        let first = compose_detailed(&trend);
        assert_eq!(first, compose_detailed(&trend));
        assert_eq!(
            first,
            "🔥 いま話題: ビットコイン\n\n💬 12,450件のツイート\n\n#投資 #トレンド #マーケット"
        );
    }

    #[test]
    fn test_compose_detailed_without_volume() {
        let text = compose_detailed(&Trend::new("金利", None));
        assert_eq!(text, "🔥 いま話題: 金利\n\n#投資 #トレンド #マーケット");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(12450), "12,450");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_date_tag() {
        assert_eq!(date_tag(june_15()), "0615");
        assert_eq!(date_tag(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()), "1201");
    }
}
