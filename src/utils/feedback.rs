use crate::services::notifier::{Notifier, NotifyError};

/// Feedback types for different command outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
}

impl FeedbackType {
    pub fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
        }
    }

    /// Prefixes the message with this type's emoji.
    pub fn format(&self, message: &str) -> String {
        format!("{} {}", self.emoji(), message)
    }
}

/// Replies to the chat a command came from.
pub struct CommandFeedback<'a> {
    notifier: &'a dyn Notifier,
    chat_id: i64,
}

impl<'a> CommandFeedback<'a> {
    pub fn new(notifier: &'a dyn Notifier, chat_id: i64) -> Self {
        Self { notifier, chat_id }
    }

    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> Result<(), NotifyError> {
        self.notifier
            .send_message(self.chat_id, &feedback_type.format(message))
            .await
    }

    pub async fn success(&self, message: &str) -> Result<(), NotifyError> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn error(&self, message: &str) -> Result<(), NotifyError> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn warning(&self, message: &str) -> Result<(), NotifyError> {
        self.send(FeedbackType::Warning, message).await
    }

    pub async fn info(&self, message: &str) -> Result<(), NotifyError> {
        self.send(FeedbackType::Info, message).await
    }

    /// Send validation error with helpful suggestion
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> Result<(), NotifyError> {
        let message = format!("{error}\n\n💡 Suggestion: {suggestion}");
        self.send(FeedbackType::Error, &message).await
    }
}
