use crate::bot::commands::{self, Command, CommandError, HELP_TEXT};
use crate::bot::handlers::BotHandler;
use crate::bot::update::IncomingMessage;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success, log_validation_error};

pub async fn command_handler(
    handler: &BotHandler,
    msg: &IncomingMessage,
    text: &str,
) -> Result<(), CommandError> {
    let chat_id = msg.chat_id();
    let cmd = Command::parse(text);
    let name = cmd.name();
    log_command_start(name, chat_id, None);

    let result = match cmd {
        Command::Trainer => {
            commands::trainer::handle_trainer(handler, chat_id, msg.sender_first_name()).await
        }
        Command::Client { trainer_id, name } => {
            commands::client::handle_client(handler, chat_id, trainer_id, &name).await
        }
        Command::Sessions => commands::sessions::handle_sessions(handler, chat_id).await,
        Command::Sync(action) => commands::sync::handle_sync(handler, chat_id, action).await,
        Command::Invalid { command, input, error } => {
            log_validation_error(command, &input, &error, chat_id);
            CommandFeedback::new(handler.notifier.as_ref(), chat_id)
                .validation_error(&error, commands::usage_example(command))
                .await
                .map_err(CommandError::from)
        }
        Command::Help => handler
            .notifier
            .send_message(chat_id, HELP_TEXT)
            .await
            .map_err(CommandError::from),
    };

    match &result {
        Ok(()) => log_command_success(name, chat_id, None),
        Err(e) => log_command_error(name, chat_id, &e.to_string()),
    }
    result
}
