use thiserror::Error;

/// Errors returned by [`crate::TelegramNotifier::send`].
///
/// None of the variants carry the bot token; request URLs are stripped from
/// wrapped `reqwest` errors because the token is part of the path.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("telegram credentials missing (bot token set: {token_set}, chat id set: {chat_id_set})")]
    MissingCredentials { token_set: bool, chat_id_set: bool },

    #[error("telegram request timed out")]
    Timeout,

    #[error("telegram network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-200 status, or a 200 whose body says `"ok": false`.
    #[error("telegram rejected the message (HTTP {status}): {description}")]
    Rejected { status: u16, description: String },

    /// HTTP 200 with a body that is not a Bot API response.
    #[error("malformed telegram response: {0}")]
    MalformedResponse(String),

    #[error("failed to build telegram HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
