//! # Message Delivery
//!
//! Sends the composed text to its destination. Delivery is a single best-effort
//! attempt: no retry, no queue. The caller logs a failed send and carries on.
//!
//! - [`TelegramNotifier`] posts to the Telegram Bot API `sendMessage` method,
//!   splitting text over the per-message limit into several messages
//! - [`StdoutNotifier`] prints the text, used when no Telegram credentials are set

use crate::config::{Config, TelegramConfig};
use log::{info, warn};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while delivering a message.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// HTTP request failed (network, timeout, or protocol error)
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Messaging endpoint rejected the message
    #[error("messaging endpoint returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

// The endpoint URL embeds the bot token
impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Http(err.without_url())
    }
}

/// Destination for report text.
pub trait Notifier {
    fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

/// Telegram bot destination.
pub struct TelegramNotifier {
    http: reqwest::blocking::Client,
    endpoint: String,
    chat_id: String,
}

/// Telegram rejects messages longer than this many characters
pub const TELEGRAM_MAX_CHARS: usize = 4096;

impl TelegramNotifier {
    pub fn new(
        config: &TelegramConfig,
        token: &str,
        chat_id: String,
    ) -> Result<Self, DeliveryError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(TelegramNotifier {
            http,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.base_url.trim_end_matches('/'),
                token
            ),
            chat_id,
        })
    }

    fn post(&self, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DeliveryError::Rejected { status, body });
        }
        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let parts = split_message(text, TELEGRAM_MAX_CHARS);
        if parts.len() > 1 {
            warn!(
                "Message of {} characters split into {} parts",
                text.chars().count(),
                parts.len()
            );
        }

        // Stop at the first failure so the chat never sees parts out of order
        for part in &parts {
            self.post(part)?;
        }

        info!(
            "📨 Delivered {} characters to Telegram in {} message(s)",
            text.chars().count(),
            parts.len()
        );
        Ok(())
    }
}

/// Prints messages to stdout, for local runs without credentials.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn send(&self, text: &str) -> Result<(), DeliveryError> {
        println!("{text}\n");
        Ok(())
    }
}

/// Pick the notifier the environment allows: Telegram when its token and chat id
/// are set, stdout otherwise.
pub fn from_config(config: &Config) -> Box<dyn Notifier> {
    let Some((token, chat_id)) = config.telegram_credentials() else {
        warn!(
            "{} / {} not set, printing messages to stdout",
            config.telegram.token_env, config.telegram.chat_id_env
        );
        return Box::new(StdoutNotifier);
    };

    match TelegramNotifier::new(&config.telegram, &token, chat_id) {
        Ok(notifier) => Box::new(notifier),
        Err(e) => {
            warn!("Telegram client unavailable ({}), printing messages to stdout", e);
            Box::new(StdoutNotifier)
        }
    }
}

/// Split `text` into parts of at most `max` characters, breaking at line ends
/// where possible. A single line longer than `max` is cut mid-line.
fn split_message(text: &str, max: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;

    while let Some((cut, _)) = rest.char_indices().nth(max) {
        let split = if rest[cut..].starts_with('\n') {
            cut
        } else {
            match rest[..cut].rfind('\n') {
                Some(newline) if newline > 0 => newline,
                _ => cut,
            }
        };
        parts.push(&rest[..split]);
        rest = &rest[split..];
        rest = rest.strip_prefix('\n').unwrap_or(rest);
    }

    if !rest.is_empty() || parts.is_empty() {
        parts.push(rest);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telegram_config(base_url: &str) -> TelegramConfig {
        TelegramConfig {
            base_url: base_url.to_string(),
            timeout_secs: 2,
            ..TelegramConfig::default()
        }
    }

    #[test]
    fn test_short_message_is_one_part() {
        assert_eq!(split_message("short", 10), vec!["short"]);
        assert_eq!(split_message("", 3), vec![""]);
    }

    #[test]
    fn test_long_message_splits_at_line_ends() {
        assert_eq!(
            split_message("aaa\nbbb\nccc", 7),
            vec!["aaa\nbbb", "ccc"]
        );
        assert_eq!(split_message("aaaa\nbb\ncccc", 6), vec!["aaaa", "bb", "cccc"]);
        // No empty trailing message
        assert_eq!(split_message("abc\n", 3), vec!["abc"]);
    }

    #[test]
    fn test_overlong_line_is_cut_on_char_boundaries() {
        assert_eq!(split_message("✅✅✅✅✅", 2), vec!["✅✅", "✅✅", "✅"]);
    }

    #[test]
    fn test_split_keeps_every_line() {
        let text = (0..2000)
            .map(|i| format!("✅ ON  NE {:>2} kn @ 09:00", i % 40))
            .collect::<Vec<_>>()
            .join("\n");

        let parts = split_message(&text, TELEGRAM_MAX_CHARS);
        assert!(parts.len() > 1);
        assert!(parts
            .iter()
            .all(|part| part.chars().count() <= TELEGRAM_MAX_CHARS));
        assert_eq!(parts.join("\n"), text);
    }

    #[test]
    fn test_endpoint_includes_token() {
        let notifier = TelegramNotifier::new(
            &telegram_config("https://api.telegram.org/"),
            "123:abc",
            "42".into(),
        )
        .unwrap();
        assert_eq!(
            notifier.endpoint,
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
        assert_eq!(notifier.chat_id, "42");
    }

    #[test]
    fn test_delivery_error_hides_token() {
        let token = "123456:SECRETTOKEN";
        let notifier =
            TelegramNotifier::new(&telegram_config("http://127.0.0.1:9"), token, "42".into())
                .unwrap();

        let err = notifier.send("hello").unwrap_err();
        assert!(matches!(err, DeliveryError::Http(_)));
        assert!(!err.to_string().contains(token), "leaked token in: {err}");
        assert!(!format!("{err:?}").contains(token), "leaked token in: {err:?}");
    }

    #[test]
    fn test_stdout_never_fails() {
        assert!(StdoutNotifier.send("hello").is_ok());
    }
}
