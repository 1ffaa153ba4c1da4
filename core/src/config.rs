//! Client configuration.

use std::{fmt, str::FromStr, time::Duration};

use config::{ConfigError, Environment};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.lardi-trans.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Language of names in reference-data responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    #[default]
    Uk,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::Uk => "uk",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language {0:?}, expected \"ru\" or \"uk\"")]
pub struct ParseLanguageError(String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "uk" => Ok(Language::Uk),
            _ => Err(ParseLanguageError(s.to_string())),
        }
    }
}

/// Static settings of a `LardiClient`. Not changed after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// Sent verbatim in the `Authorization` header.
    pub api_key: String,
    pub timeout: Duration,
    pub language: Language,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            language: Language::default(),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Replace an empty base URL or zero timeout with the defaults.
    pub fn with_defaults(mut self) -> Self {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }
        self
    }

    /// Load from `LARDI_API_KEY`, `LARDI_BASE_URL`, `LARDI_TIMEOUT_SECS` and
    /// `LARDI_LANGUAGE`. Only the API key is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("LARDI").prefix_separator("_"))
    }

    fn from_environment(source: Environment) -> Result<Self, ConfigError> {
        let raw: EnvConfig = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        let mut config = Config::new(raw.api_key);
        if let Some(base_url) = raw.base_url {
            config.base_url = base_url;
        }
        if let Some(secs) = raw.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(language) = raw.language {
            config.language = language
                .parse()
                .map_err(|err: ParseLanguageError| ConfigError::Message(err.to_string()))?;
        }
        Ok(config.with_defaults())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(String::new())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("language", &self.language)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct EnvConfig {
    api_key: String,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    language: Option<String>,
}
