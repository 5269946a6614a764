use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_key: String,
    pub content_directory: PathBuf,
    pub content_base_url: Option<String>,
    pub content_cache_days: i64,
    pub tick_interval: Duration,
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let tick_interval_ms: u64 = parse_or(&lookup, "TICK_INTERVAL_MS", 1000)?;
        if tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "TICK_INTERVAL_MS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://taboo.db?mode=rwc".to_string()),
            session_key: lookup("SESSION_KEY").unwrap_or_else(|| "default".to_string()),
            content_directory: lookup("CONTENT_DIRECTORY")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            content_base_url: lookup("CONTENT_BASE_URL").filter(|url| !url.trim().is_empty()),
            content_cache_days: parse_or(&lookup, "CONTENT_CACHE_DAYS", 7)?,
            tick_interval: Duration::from_millis(tick_interval_ms),
            rng_seed: lookup("RNG_SEED")
                .map(|value| parse_value("RNG_SEED", value))
                .transpose()?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => parse_value(key, value),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
