use async_trait::async_trait;
use teloxide::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("Failed to send Telegram message to chat {chat_id}: {source}")]
pub struct NotifyError {
    pub chat_id: i64,
    #[source]
    pub source: teloxide::RequestError,
}

/// Outbound chat messages. Implemented over the Telegram Bot API.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), NotifyError>;
}

/// Sends plain-text messages via `sendMessage`. Without a bot token every
/// send is a logged no-op.
pub struct TelegramNotifier {
    bot: Option<Bot>,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str) -> Self {
        let bot = if bot_token.trim().is_empty() {
            tracing::warn!("TELEGRAM_BOT_TOKEN is empty; outbound messages are disabled");
            None
        } else {
            Some(Bot::new(bot_token))
        };
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        let Some(bot) = &self.bot else {
            tracing::debug!("Skipping message to chat {}: no bot token", chat_id);
            return Ok(());
        };

        bot.send_message(ChatId(chat_id), text)
            .await
            .map_err(|source| NotifyError { chat_id, source })?;
        Ok(())
    }
}
