use crate::compose::{PostStyle, DEFAULT_MAX_LENGTH, TRENDS_SLOT};
use crate::error::BotError;
use crate::feeds::{parse_limit, KeywordSet, RegionId};
use crate::twitter::{Credentials, X_API_BASE};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_TRENDS: usize = 5;
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

const ENV_API_KEY: &str = "API_KEY";
const ENV_API_SECRET: &str = "API_SECRET";
const ENV_ACCESS_TOKEN: &str = "ACCESS_TOKEN";
const ENV_ACCESS_SECRET: &str = "ACCESS_SECRET";
const ENV_MAX_TRENDS: &str = "MAX_TRENDS_TO_POST";
const ENV_DRY_RUN: &str = "DRY_RUN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials: CredentialsConfig,
    pub bot: BotConfig,
    pub content: ContentConfig,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_secret: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = |v: &Option<String>| if present(v) { "<set>" } else { "<missing>" };
        f.debug_struct("CredentialsConfig")
            .field("api_key", &set(&self.api_key))
            .field("api_secret", &set(&self.api_secret))
            .field("access_token", &set(&self.access_token))
            .field("access_secret", &set(&self.access_secret))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub max_trends: usize,
    pub dry_run: bool,
    pub max_length: usize,
    pub region: RegionId,
    pub timezone: String,
    pub api_base: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            max_trends: DEFAULT_MAX_TRENDS,
            dry_run: false,
            max_length: DEFAULT_MAX_LENGTH,
            region: RegionId::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            api_base: X_API_BASE.to_string(),
        }
    }
}

/// Optional overrides of the built-in vocabulary and post pools.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub keywords: Option<Vec<String>>,
    pub templates: Option<Vec<String>>,
    pub emojis: Option<Vec<String>>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl Config {
    /// `$XDG_CONFIG_HOME/trendbot/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trendbot").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, BotError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BotError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
            .map_err(|e| BotError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Loads the file (an explicit path must exist, the default one may
    /// not), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, BotError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let creds = &mut self.credentials;
        for (key, slot) in [
            (ENV_API_KEY, &mut creds.api_key),
            (ENV_API_SECRET, &mut creds.api_secret),
            (ENV_ACCESS_TOKEN, &mut creds.access_token),
            (ENV_ACCESS_SECRET, &mut creds.access_secret),
        ] {
            if let Some(value) = lookup(key) {
                *slot = Some(value);
            }
        }

        if let Some(raw) = lookup(ENV_MAX_TRENDS) {
            self.bot.max_trends = parse_limit(&raw).map_err(|e| match e {
                BotError::InvalidArgument(msg) => {
                    BotError::InvalidArgument(format!("{}: {}", ENV_MAX_TRENDS, msg))
                }
                _ => e,
            })?;
        }

        if let Some(raw) = lookup(ENV_DRY_RUN) {
            self.bot.dry_run = raw.trim().eq_ignore_ascii_case("true");
        }

        Ok(())
    }

    /// Checks everything a run needs before touching the network.
    pub fn validate(&self) -> Result<(), BotError> {
        let creds = &self.credentials;
        let missing: Vec<&str> = [
            (ENV_API_KEY, &creds.api_key),
            (ENV_API_SECRET, &creds.api_secret),
            (ENV_ACCESS_TOKEN, &creds.access_token),
            (ENV_ACCESS_SECRET, &creds.access_secret),
        ]
        .into_iter()
        .filter(|(_, value)| !present(value))
        .map(|(key, _)| key)
        .collect();

        if !missing.is_empty() {
            return Err(BotError::config(format!(
                "missing credentials: {}",
                missing.join(", ")
            )));
        }

        if self.bot.max_length == 0 {
            return Err(BotError::config("bot.max_length must be positive"));
        }

        self.timezone()?;

        if let Some(templates) = &self.content.templates {
            if templates.is_empty() {
                return Err(BotError::config("content.templates must not be empty"));
            }
            if templates.iter().any(|t| t.trim().is_empty()) {
                return Err(BotError::config("content.templates contains a blank entry"));
            }
            if let Some(bad) = templates.iter().find(|t| !t.contains(TRENDS_SLOT)) {
                return Err(BotError::config(format!(
                    "template has no {} slot: {:?}",
                    TRENDS_SLOT, bad
                )));
            }
        }
        check_pool("content.emojis", self.content.emojis.as_deref())?;
        check_pool("content.keywords", self.content.keywords.as_deref())?;

        Ok(())
    }

    pub fn credentials(&self) -> Result<Credentials, BotError> {
        let get = |key: &str, value: &Option<String>| {
            value
                .clone()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| BotError::config(format!("missing credential {}", key)))
        };
        let creds = &self.credentials;
        Ok(Credentials {
            api_key: get(ENV_API_KEY, &creds.api_key)?,
            api_secret: get(ENV_API_SECRET, &creds.api_secret)?,
            access_token: get(ENV_ACCESS_TOKEN, &creds.access_token)?,
            access_secret: get(ENV_ACCESS_SECRET, &creds.access_secret)?,
        })
    }

    pub fn timezone(&self) -> Result<Tz, BotError> {
        self.bot
            .timezone
            .parse::<Tz>()
            .map_err(|_| BotError::config(format!("unknown timezone {:?}", self.bot.timezone)))
    }

    pub fn keyword_set(&self) -> KeywordSet {
        match &self.content.keywords {
            Some(keywords) => KeywordSet::new(keywords.iter().cloned()),
            None => KeywordSet::investment(),
        }
    }

    pub fn post_style(&self) -> PostStyle {
        let defaults = PostStyle::default();
        PostStyle {
            templates: self.content.templates.clone().unwrap_or(defaults.templates),
            emojis: self.content.emojis.clone().unwrap_or(defaults.emojis),
        }
    }
}

/// An overridden pool must be non-empty and hold no blank entries.
fn check_pool(name: &str, pool: Option<&[String]>) -> Result<(), BotError> {
    match pool {
        Some([]) => Err(BotError::config(format!("{} must not be empty", name))),
        Some(entries) if entries.iter().any(|e| e.trim().is_empty()) => {
            Err(BotError::config(format!("{} contains a blank entry", name)))
        }
        _ => Ok(()),
    }
}
