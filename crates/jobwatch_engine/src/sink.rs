use std::time::Duration;

use watch_logging::{watch_debug, watch_warn};

use crate::types::SinkError;

const MAIL_TIMEOUT: Duration = Duration::from_secs(30);
const MAIL_SUBJECT: &str = "New jobs on the watched portal";

const TELEGRAM_TIMEOUT: Duration = Duration::from_secs(15);
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// One notification channel. Failures are isolated per sink; the
/// dispatcher logs them and carries on.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short channel name used in logs.
    fn name(&self) -> &'static str;

    async fn deliver(&self, message: &str) -> Result<(), SinkError>;
}

/// Addressing and credentials for the HTTP mail API.
#[derive(Debug, Clone)]
pub struct MailApiSettings {
    pub api_url: String,
    pub api_token: String,
    pub from_addr: String,
    pub to_addr: String,
}

/// Sends alerts as email through an HTTP mail API.
#[derive(Debug, Clone)]
pub struct MailApiSink {
    settings: MailApiSettings,
}

impl MailApiSink {
    pub fn new(settings: MailApiSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl NotificationSink for MailApiSink {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn deliver(&self, message: &str) -> Result<(), SinkError> {
        let client = build_client(MAIL_TIMEOUT)?;
        let body = serde_json::json!({
            "from": self.settings.from_addr,
            "to": [self.settings.to_addr],
            "subject": MAIL_SUBJECT,
            "text": message,
        });

        let response = client
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|err| SinkError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Sends alerts through the Telegram Bot API, one request per chat.
#[derive(Debug, Clone)]
pub struct TelegramSink {
    bot_token: String,
    chat_ids: Vec<String>,
    api_base: String,
}

impl TelegramSink {
    pub fn new(bot_token: impl Into<String>, chat_ids: Vec<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_ids,
            api_base: TELEGRAM_API_BASE.to_string(),
        }
    }

    /// Points the sink at a different API host. Used by tests.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait::async_trait]
impl NotificationSink for TelegramSink {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn deliver(&self, message: &str) -> Result<(), SinkError> {
        let client = build_client(TELEGRAM_TIMEOUT)?;
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let mut delivered = 0usize;
        for chat_id in &self.chat_ids {
            let result = client
                .post(&url)
                .form(&[("chat_id", chat_id.as_str()), ("text", message)])
                .send()
                .await;
            match result {
                Ok(response) if response.status().is_success() => {
                    delivered += 1;
                    watch_debug!("telegram alert sent to {chat_id}");
                }
                Ok(response) => {
                    watch_warn!(
                        "telegram rejected alert for {} ({})",
                        chat_id,
                        response.status()
                    );
                }
                Err(err) => {
                    watch_warn!("telegram send failed for {chat_id}: {err}");
                }
            }
        }

        if delivered == 0 && !self.chat_ids.is_empty() {
            return Err(SinkError::AllRecipientsFailed);
        }
        Ok(())
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, SinkError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| SinkError::Transport(err.to_string()))
}
