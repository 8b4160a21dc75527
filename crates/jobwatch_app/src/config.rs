use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use jobwatch_engine::MailApiSettings;

/// Application configuration loaded from environment variables.
///
/// Everything here is fixed for the lifetime of the process; changing the
/// filter rules or the sink credentials requires a restart.
#[derive(Debug, Clone)]
pub struct Config {
    pub portal_url: String,
    pub no_jobs_text: String,
    pub ignored_postcodes: Vec<String>,
    pub ignored_services: Vec<String>,
    pub poll_interval: Duration,
    pub port: u16,
    pub mail: Option<MailApiSettings>,
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_ids: Vec<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    /// A `.env` file is honored in development.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        let portal_url = env::var("PORTAL_URL").context("PORTAL_URL must be set")?;
        let poll_interval = env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("POLL_INTERVAL_SECS must be a number of seconds")?;
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let mail = match (
            env::var("MAIL_API_URL").ok(),
            env::var("MAIL_API_TOKEN").ok(),
            env::var("MAIL_FROM").ok(),
            env::var("MAIL_TO").ok(),
        ) {
            (Some(api_url), Some(api_token), Some(from_addr), Some(to_addr)) => {
                Some(MailApiSettings {
                    api_url,
                    api_token,
                    from_addr,
                    to_addr,
                })
            }
            _ => None,
        };

        let telegram = match (
            env::var("TELEGRAM_BOT_TOKEN").ok(),
            env::var("TELEGRAM_CHAT_IDS").ok(),
        ) {
            (Some(bot_token), Some(raw_ids)) => {
                let chat_ids = split_list(&raw_ids);
                if chat_ids.is_empty() {
                    None
                } else {
                    Some(TelegramConfig {
                        bot_token,
                        chat_ids,
                    })
                }
            }
            _ => None,
        };

        Ok(Self {
            portal_url,
            no_jobs_text: env::var("NO_JOBS_TEXT").unwrap_or_default(),
            ignored_postcodes: split_list(&env::var("IGNORED_POSTCODES").unwrap_or_default()),
            ignored_services: split_list(&env::var("IGNORED_SERVICES").unwrap_or_default()),
            poll_interval: Duration::from_secs(poll_interval),
            port,
            mail,
            telegram,
        })
    }
}

/// Splits a comma-separated env value, trimming entries and dropping empties.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
