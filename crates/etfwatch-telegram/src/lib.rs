//! Telegram Bot API notifier for etfwatch.
//!
//! Sends one HTML-formatted message per call to `sendMessage`. Credentials
//! are optional at construction time; a missing token or chat ID surfaces
//! as [`NotifyError::MissingCredentials`] when sending.

pub mod error;
pub mod notifier;

pub use error::NotifyError;
pub use notifier::{CredentialStatus, TelegramNotifier};
