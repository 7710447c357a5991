pub mod message;

use std::sync::Arc;

use crate::bot::commands::CommandError;
use crate::bot::update::IncomingMessage;
use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::services::calendar_sync::CalendarSync;
use crate::services::notifier::Notifier;

/// Everything a command needs to act and reply. Built per webhook call.
#[derive(Clone)]
pub struct BotHandler {
    pub db: DatabaseManager,
    pub notifier: Arc<dyn Notifier>,
    pub sync: Arc<CalendarSync>,
    pub config: Arc<Config>,
}

impl BotHandler {
    pub fn new(
        db: DatabaseManager,
        notifier: Arc<dyn Notifier>,
        sync: Arc<CalendarSync>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            db,
            notifier,
            sync,
            config,
        }
    }

    /// Handles one chat message. Messages without text are ignored.
    pub async fn handle_message(&self, msg: &IncomingMessage) -> Result<(), CommandError> {
        let Some(text) = msg.text.as_deref() else {
            return Ok(());
        };
        message::command_handler(self, msg, text.trim()).await
    }
}
