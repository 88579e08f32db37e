//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// How updates reach the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotMode {
    /// Long polling via `getUpdates`
    Polling,
    /// Telegram pushes updates to `url` (must route to `/telegram/webhook`)
    Webhook { url: String },
}

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot token
    pub telegram_token: String,
    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// OpenAI API key
    pub openai_api_key: String,
    /// OpenAI API base URL
    pub openai_base_url: String,
    /// Model used for both narrations
    pub openai_model: String,

    pub mode: BotMode,
    /// Shared secret Telegram echoes in `X-Telegram-Bot-Api-Secret-Token`
    pub webhook_secret: Option<String>,

    /// Port for the health check and webhook listener
    pub server_port: u16,

    /// Unresolved events older than this are dropped
    pub event_ttl: Duration,
    /// How often the stale event sweep runs
    pub sweep_interval: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mode = match env::var("BOT_MODE")
            .unwrap_or_else(|_| "polling".to_string())
            .to_lowercase()
            .as_str()
        {
            "polling" => BotMode::Polling,
            "webhook" => BotMode::Webhook {
                url: required("WEBHOOK_URL")?,
            },
            other => bail!("BOT_MODE must be 'polling' or 'webhook', got '{}'", other),
        };

        Ok(Self {
            telegram_token: required("TG_TOKEN")?,
            telegram_api_url: env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),

            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),

            mode,
            webhook_secret: env::var("WEBHOOK_SECRET").ok().filter(|s| !s.is_empty()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            event_ttl: parse_ttl_minutes(
                &env::var("EVENT_TTL_MINUTES").unwrap_or_else(|_| "360".to_string()),
            )?,
            sweep_interval: parse_sweep_interval(
                &env::var("SWEEP_INTERVAL_SECS").unwrap_or_else(|_| "600".to_string()),
            )?,
        })
    }
}

/// Read a variable that must be present and non-empty
fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{} environment variable is required", name),
    }
}

/// Event lifetime from a whole number of minutes
fn parse_ttl_minutes(raw: &str) -> Result<Duration> {
    let minutes: u64 = raw
        .trim()
        .parse()
        .context("EVENT_TTL_MINUTES must be a whole number of minutes")?;
    let Some(secs) = minutes.checked_mul(60) else {
        bail!("EVENT_TTL_MINUTES is too large: {}", minutes);
    };
    Ok(Duration::from_secs(secs))
}

/// Sweep period in seconds; zero would spin the sweeper
fn parse_sweep_interval(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .context("SWEEP_INTERVAL_SECS must be a whole number of seconds")?;
    if secs == 0 {
        bail!("SWEEP_INTERVAL_SECS must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_minutes_converted_to_seconds() {
        assert_eq!(parse_ttl_minutes("360").unwrap(), Duration::from_secs(21_600));
        assert_eq!(parse_ttl_minutes(" 0 ").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_ttl_overflow_rejected() {
        let err = parse_ttl_minutes(&u64::MAX.to_string()).unwrap_err();

        assert!(err.to_string().contains("too large"));
        assert!(parse_ttl_minutes("six hours").is_err());
    }

    #[test]
    fn test_sweep_interval_must_be_positive() {
        assert_eq!(parse_sweep_interval("600").unwrap(), Duration::from_secs(600));
        assert!(parse_sweep_interval("0").is_err());
        assert!(parse_sweep_interval("-5").is_err());
    }
}
