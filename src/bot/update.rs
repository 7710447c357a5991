use serde::Deserialize;

/// The subset of a Telegram `Update` the webhook reads. Unknown fields are
/// ignored, so any update kind deserializes.
///
/// Not `teloxide::types::Update`: that type requires every field Telegram
/// always sends (`message_id`, `date`, chat kind), while this view needs only
/// the chat id, sender and text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramUpdate {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub edited_message: Option<IncomingMessage>,
}

impl TelegramUpdate {
    /// The new message, or the edited one when the update carries no new message.
    pub fn into_message(self) -> Option<IncomingMessage> {
        self.message.or(self.edited_message)
    }
}

/// A new or edited message.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<Sender>,
    #[serde(default)]
    pub text: Option<String>,
}

impl IncomingMessage {
    pub fn chat_id(&self) -> i64 {
        self.chat.id
    }

    pub fn sender_first_name(&self) -> Option<&str> {
        self.from.as_ref()?.first_name.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub first_name: Option<String>,
}
