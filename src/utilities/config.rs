use std::env;
use std::fmt;
use std::time::Duration;

use log::LevelFilter;
use reqwest::Url;

const DEFAULT_API_URL: &str = "https://icanhazdadjoke.com/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

pub struct Config {
    pub api_url: Url,
    pub timeout: Duration,
    pub log_level: LevelFilter,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidApiUrl(String),
    InvalidTimeout(String),
    InvalidLogLevel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidApiUrl(value) => write!(f, "DADJOKE_API_URL is not an HTTP URL: {value}"),
            Self::InvalidTimeout(value) => {
                write!(f, "DADJOKE_TIMEOUT_SECS is not a positive number of seconds: {value}")
            }
            Self::InvalidLogLevel(value) => write!(f, "DADJOKE_LOG is not a log level: {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url =
            parse_api_url(lookup("DADJOKE_API_URL").as_deref().unwrap_or(DEFAULT_API_URL))?;

        let timeout = match lookup("DADJOKE_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(value)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let log_level = match lookup("DADJOKE_LOG") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidLogLevel(value))?,
            None => DEFAULT_LOG_LEVEL,
        };

        Ok(Self { api_url, timeout, log_level })
    }
}

/// Joined against with relative paths later, so the path always gets a
/// trailing slash.
fn parse_api_url(value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value.trim()).map_err(|_| ConfigError::InvalidApiUrl(value.into()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiUrl(value.into()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}
