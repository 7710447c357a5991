use chrono::Utc;

use crate::bot::commands::{CommandError, SyncAction};
use crate::bot::handlers::BotHandler;
use crate::database::models::Trainer;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::log_command_error;

/// `/sync`, `/sync <minutes>` and `/sync off`. Only registered trainers may
/// use them.
pub async fn handle_sync(
    handler: &BotHandler,
    chat_id: i64,
    action: SyncAction,
) -> Result<(), CommandError> {
    let feedback = CommandFeedback::new(handler.notifier.as_ref(), chat_id);

    let Some(trainer) = Trainer::find_by_chat_id(&handler.db.pool, chat_id).await? else {
        feedback
            .warning("Register as a trainer with /trainer first.")
            .await?;
        return Ok(());
    };

    match action {
        SyncAction::Disable => {
            Trainer::disable_auto_sync(&handler.db.pool, trainer.id).await?;
            feedback.success("Auto-sync disabled.").await?;
        }
        SyncAction::Enable { minutes } => {
            let trainer = Trainer::enable_auto_sync(&handler.db.pool, trainer.id, minutes).await?;
            feedback
                .success(&format!(
                    "Auto-sync enabled: every {} min.",
                    trainer.sync_interval_minutes
                ))
                .await?;
        }
        SyncAction::RunNow => {
            match handler
                .sync
                .sync_and_mark_synced(&handler.db, trainer.id, Utc::now())
                .await
            {
                Ok(events) => {
                    feedback
                        .success(&format!("Sync complete. Events: {events}."))
                        .await?;
                }
                Err(e) => {
                    log_command_error("/sync", chat_id, &e.to_string());
                    feedback.error(&format!("Sync failed: {e}")).await?;
                }
            }
        }
    }
    Ok(())
}
