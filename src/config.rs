//! Bot configuration from environment variables

use crate::state_machine::DialogueVariant;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN is not set")]
    MissingToken,
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub variant: DialogueVariant,
    pub poll_timeout: Duration,
    pub api_url: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bot_token = get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::MissingToken)?;

        let variant = match get("HRZ_DIALOGUE") {
            Some(value) => value.parse::<DialogueVariant>().map_err(|()| ConfigError::Invalid {
                var: "HRZ_DIALOGUE",
                value,
            })?,
            None => DialogueVariant::default(),
        };

        let poll_timeout = match get("HRZ_POLL_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    var: "HRZ_POLL_TIMEOUT_SECS",
                    value,
                })?,
            None => Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
        };

        let api_url = get("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            bot_token,
            variant,
            poll_timeout,
            api_url,
        })
    }

    #[cfg(test)]
    pub fn for_token(token: &str) -> Self {
        Self {
            bot_token: token.to_string(),
            variant: DialogueVariant::default(),
            poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

// Keep the token out of logs
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("variant", &self.variant)
            .field("poll_timeout", &self.poll_timeout)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl FromStr for DialogueVariant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "single_path" | "single" => Ok(DialogueVariant::SinglePath),
            "two_path" | "two" => Ok(DialogueVariant::TwoPath),
            _ => Err(()),
        }
    }
}
