//! HTTP client for the Telegram Bot API `sendMessage` endpoint.

use std::time::Duration;

use etfwatch_core::AppConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Masked view of the configured credentials, safe to log or return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialStatus {
    pub bot_token_set: bool,
    pub bot_token_length: usize,
    pub chat_id_set: bool,
    pub chat_id_is_numeric: bool,
}

/// Sends messages to one Telegram chat.
///
/// Use [`TelegramNotifier::new`] with a custom `api_base` to point at a mock
/// server in tests.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_base", &self.api_base)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[redacted]"))
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    /// Creates a notifier. Blank credentials are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Build`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_base: &str,
        bot_token: Option<String>,
        chat_id: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(NotifyError::Build)?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.filter(|t| !t.trim().is_empty()),
            chat_id: chat_id.filter(|c| !c.trim().is_empty()),
        })
    }

    /// Creates a notifier from process configuration.
    ///
    /// # Errors
    ///
    /// See [`TelegramNotifier::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, NotifyError> {
        Self::new(
            &config.telegram_api_base,
            config.telegram_bot_token.clone(),
            config.telegram_chat_id.clone(),
            config.request_timeout_secs,
        )
    }

    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    #[must_use]
    pub fn credential_status(&self) -> CredentialStatus {
        let chat_id = self.chat_id.as_deref().unwrap_or_default();
        let digits = chat_id.strip_prefix('-').unwrap_or(chat_id);
        CredentialStatus {
            bot_token_set: self.bot_token.is_some(),
            bot_token_length: self.bot_token.as_deref().map_or(0, str::len),
            chat_id_set: self.chat_id.is_some(),
            chat_id_is_numeric: !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        }
    }

    /// Posts `text` to the configured chat using HTML parse mode.
    ///
    /// One attempt, no retry. Success requires HTTP 200 and `"ok": true`.
    ///
    /// # Errors
    ///
    /// - [`NotifyError::MissingCredentials`] if the token or chat ID is unset.
    /// - [`NotifyError::Timeout`] / [`NotifyError::Network`] on transport failure.
    /// - [`NotifyError::Rejected`] on a non-200 status or `"ok": false`.
    /// - [`NotifyError::MalformedResponse`] if a 200 body is not a Bot API response.
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let (Some(token), Some(chat_id)) = (self.bot_token.as_deref(), self.chat_id.as_deref())
        else {
            let err = NotifyError::MissingCredentials {
                token_set: self.bot_token.is_some(),
                chat_id_set: self.chat_id.is_some(),
            };
            tracing::error!(error = %err, "cannot send telegram message");
            return Err(err);
        };

        let url = format!("{}/bot{token}/sendMessage", self.api_base);
        let payload = SendMessage {
            chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };
        tracing::debug!(chat_id, chars = text.chars().count(), "sending telegram message");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_transport_error)?;

        let parsed = serde_json::from_str::<BotApiResponse>(&body);
        match (status, parsed) {
            (200, Ok(BotApiResponse { ok: true, .. })) => {
                tracing::info!(chat_id, "telegram message sent");
                Ok(())
            }
            (200, Err(e)) => {
                tracing::error!(status, error = %e, "unparseable telegram response");
                Err(NotifyError::MalformedResponse(e.to_string()))
            }
            (_, parsed) => {
                let description = parsed
                    .ok()
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| "unknown error".to_string());
                tracing::error!(
                    status,
                    description = %description,
                    chars = text.chars().count(),
                    "telegram rejected message"
                );
                Err(NotifyError::Rejected {
                    status,
                    description,
                })
            }
        }
    }
}

/// The request URL embeds the bot token, so it is dropped from the error.
fn classify_transport_error(error: reqwest::Error) -> NotifyError {
    if error.is_timeout() {
        NotifyError::Timeout
    } else {
        NotifyError::Network(error.without_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier(token: Option<&str>, chat: Option<&str>) -> TelegramNotifier {
        TelegramNotifier::new(
            "https://api.telegram.org/",
            token.map(str::to_string),
            chat.map(str::to_string),
            15,
        )
        .unwrap()
    }

    #[test]
    fn debug_redacts_token() {
        let n = notifier(Some("123456:SECRET"), Some("-100200"));
        let debug = format!("{n:?}");
        assert!(!debug.contains("SECRET"), "debug output leaked token: {debug}");
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn blank_credentials_are_unset() {
        let n = notifier(Some("  "), Some(""));
        assert!(!n.has_credentials());
        assert_eq!(
            n.credential_status(),
            CredentialStatus {
                bot_token_set: false,
                bot_token_length: 0,
                chat_id_set: false,
                chat_id_is_numeric: false,
            }
        );
    }

    #[test]
    fn credential_status_is_masked() {
        let status = notifier(Some("123456:SECRET"), Some("-100200")).credential_status();
        assert!(status.bot_token_set);
        assert_eq!(status.bot_token_length, 13);
        assert!(status.chat_id_is_numeric);

        let named = notifier(Some("t"), Some("@channel")).credential_status();
        assert!(!named.chat_id_is_numeric);
    }

    #[test]
    fn trailing_slash_is_trimmed_from_api_base() {
        assert_eq!(notifier(None, None).api_base, "https://api.telegram.org");
    }
}
