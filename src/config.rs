//! Widget configuration resolved once at start-up.
//!
//! DESIGN
//! ======
//! Values come from environment variables (optionally seeded from a `.env`
//! file by the binary). The resulting `WidgetConfig` is immutable; nothing
//! re-reads the environment once a widget exists.

use std::time::Duration;

pub const BACKEND_URL_VAR: &str = "CHAT_BACKEND_URL";
pub const GREETING_DELAY_VAR: &str = "CHAT_GREETING_DELAY_MS";
pub const GREETING_TEXT_VAR: &str = "CHAT_GREETING_TEXT";

pub const DEFAULT_GREETING_DELAY_MS: u64 = 600;
pub const DEFAULT_GREETING_TEXT: &str = "Hello and welcome to Ninewells Hospital. How can I help you today?";

/// Errors produced while resolving widget configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set or is blank.
    #[error("missing config: env var {var} not set")]
    Missing { var: &'static str },

    /// A variable is set but its value cannot be used.
    #[error("invalid config: {var}={value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Endpoint every turn is POSTed to.
    pub backend_url: String,
    /// Delay between first open and the greeting seed.
    pub greeting_delay: Duration,
    pub greeting_text: String,
}

impl WidgetConfig {
    /// Config with default greeting settings for the given endpoint.
    #[must_use]
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            greeting_delay: Duration::from_millis(DEFAULT_GREETING_DELAY_MS),
            greeting_text: DEFAULT_GREETING_TEXT.to_owned(),
        }
    }

    /// Build config from process environment variables.
    ///
    /// Required:
    /// - `CHAT_BACKEND_URL`
    ///
    /// Optional:
    /// - `CHAT_GREETING_DELAY_MS`: default 600
    /// - `CHAT_GREETING_TEXT`: default hospital welcome line
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL is missing or any value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`WidgetConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url = lookup(BACKEND_URL_VAR)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing { var: BACKEND_URL_VAR })?;
        if reqwest::Url::parse(&backend_url).is_err() {
            return Err(ConfigError::Invalid { var: BACKEND_URL_VAR, value: backend_url });
        }

        let greeting_delay = match lookup(GREETING_DELAY_VAR) {
            Some(raw) => {
                let ms = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::Invalid { var: GREETING_DELAY_VAR, value: raw.clone() })?;
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_GREETING_DELAY_MS),
        };

        let greeting_text = lookup(GREETING_TEXT_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GREETING_TEXT.to_owned());

        Ok(Self { backend_url, greeting_delay, greeting_text })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
