use crate::bot::commands::CommandError;
use crate::bot::handlers::BotHandler;
use crate::database::models::TrainingSession;
use crate::utils::datetime::format_session_time;
use crate::utils::feedback::CommandFeedback;

/// Most sessions listed by `/sessions`.
pub const SESSIONS_LIST_LIMIT: i64 = 5;

/// `/sessions`: lists trainings of every client registered from this chat,
/// earliest first.
pub async fn handle_sessions(handler: &BotHandler, chat_id: i64) -> Result<(), CommandError> {
    let sessions =
        TrainingSession::find_for_client_chat(&handler.db.pool, chat_id, SESSIONS_LIST_LIMIT)
            .await?;

    if sessions.is_empty() {
        CommandFeedback::new(handler.notifier.as_ref(), chat_id)
            .info("No upcoming trainings yet.")
            .await?;
        return Ok(());
    }

    handler
        .notifier
        .send_message(chat_id, &format_sessions(&sessions))
        .await?;
    Ok(())
}

pub fn format_sessions(sessions: &[TrainingSession]) -> String {
    let mut text = String::from("📅 Your upcoming trainings:");
    for session in sessions {
        text.push_str(&format!(
            "\n• {} - {}",
            format_session_time(&session.start_time),
            session.summary
        ));
    }
    text
}
