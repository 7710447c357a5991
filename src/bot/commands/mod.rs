pub mod client;
pub mod sessions;
pub mod sync;
pub mod trainer;

use crate::services::notifier::NotifyError;
use crate::utils::validation::{parse_sync_interval, parse_trainer_id, validate_client_name};

pub const HELP_TEXT: &str = "🏋️ Cozy Gym Bot commands:\n\
/trainer - register as a trainer\n\
/client <trainer_id> <client name> - register as a client of a trainer\n\
/sessions - show your upcoming trainings\n\
/sync - sync the calendar now\n\
/sync <minutes> - enable auto-sync\n\
/sync off - disable auto-sync";

/// Words accepted by `/sync` to turn auto-sync off.
const SYNC_OFF_WORDS: [&str; 3] = ["off", "disable", "stop"];

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    RunNow,
    Enable { minutes: i64 },
    Disable,
}

/// A parsed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Trainer,
    Client { trainer_id: i64, name: String },
    Sessions,
    Sync(SyncAction),
    /// A known command with an argument that failed validation.
    Invalid {
        command: &'static str,
        input: String,
        error: String,
    },
    Help,
}

impl Command {
    /// Parses message text. The first whitespace-separated token is the
    /// command (case-insensitive, `@botname` suffix ignored); anything
    /// unrecognized is [`Command::Help`].
    pub fn parse(text: &str) -> Self {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let Some(first) = parts.first() else {
            return Command::Help;
        };
        let command = first.to_lowercase();
        let command = command.split('@').next().unwrap_or_default();

        match command {
            "/trainer" => Command::Trainer,
            "/client" if parts.len() >= 3 => Self::parse_client(parts[1], &parts[2..]),
            "/sessions" => Command::Sessions,
            "/sync" if parts.len() == 2 => Self::parse_sync_argument(parts[1]),
            "/sync" => Command::Sync(SyncAction::RunNow),
            _ => Command::Help,
        }
    }

    fn parse_client(trainer_id: &str, name_parts: &[&str]) -> Self {
        let trainer_id = match parse_trainer_id(trainer_id) {
            Ok(id) => id,
            Err(e) => return Self::invalid("/client", trainer_id, e),
        };
        let name = name_parts.join(" ");
        match validate_client_name(&name) {
            Ok(name) => Command::Client { trainer_id, name },
            Err(e) => Self::invalid("/client", &name, e),
        }
    }

    fn parse_sync_argument(argument: &str) -> Self {
        if SYNC_OFF_WORDS.contains(&argument.to_lowercase().as_str()) {
            return Command::Sync(SyncAction::Disable);
        }
        match parse_sync_interval(argument) {
            Ok(minutes) => Command::Sync(SyncAction::Enable { minutes }),
            Err(e) => Self::invalid("/sync", argument, e),
        }
    }

    fn invalid(command: &'static str, input: &str, error: anyhow::Error) -> Self {
        Command::Invalid {
            command,
            input: input.to_string(),
            error: error.to_string(),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Trainer => "/trainer",
            Command::Client { .. } => "/client",
            Command::Sessions => "/sessions",
            Command::Sync(_) => "/sync",
            Command::Invalid { command, .. } => *command,
            Command::Help => "help",
        }
    }
}

/// Example invocation shown after a rejected argument.
pub fn usage_example(command: &str) -> &'static str {
    match command {
        "/client" => "Example: /client 42 Ivan Petrov",
        "/sync" => "Example: /sync 60, or /sync off",
        _ => "Send /help to see all commands",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_case_insensitive_and_strips_bot_name() {
        assert_eq!(Command::parse("/TRAINER"), Command::Trainer);
        assert_eq!(Command::parse("/sessions@cozy_gym_bot"), Command::Sessions);
    }

    #[test]
    fn test_client_needs_id_and_name() {
        assert_eq!(Command::parse("/client 5"), Command::Help);
        assert_eq!(
            Command::parse("/client 5 Ivan   Petrov"),
            Command::Client {
                trainer_id: 5,
                name: "Ivan Petrov".to_string()
            }
        );
        assert!(matches!(
            Command::parse("/client abc Ivan"),
            Command::Invalid { command: "/client", .. }
        ));
    }

    #[test]
    fn test_sync_variants() {
        assert_eq!(Command::parse("/sync"), Command::Sync(SyncAction::RunNow));
        assert_eq!(Command::parse("/sync 1 2"), Command::Sync(SyncAction::RunNow));
        assert_eq!(
            Command::parse("/sync 15"),
            Command::Sync(SyncAction::Enable { minutes: 15 })
        );
        assert_eq!(Command::parse("/sync OFF"), Command::Sync(SyncAction::Disable));
        assert_eq!(Command::parse("/sync stop"), Command::Sync(SyncAction::Disable));
        assert!(matches!(
            Command::parse("/sync soon"),
            Command::Invalid { command: "/sync", .. }
        ));
    }

    #[test]
    fn test_unknown_text_is_help() {
        assert_eq!(Command::parse("hello there"), Command::Help);
        assert_eq!(Command::parse("   "), Command::Help);
        assert_eq!(Command::parse("/start"), Command::Help);
    }
}
