use crate::bot::commands::CommandError;
use crate::bot::handlers::BotHandler;
use crate::database::models::{Client, Trainer};
use crate::utils::feedback::CommandFeedback;

/// `/client <trainer_id> <name>`: registers the sender chat as a client of
/// the trainer. Reminders for this client go to the same chat.
pub async fn handle_client(
    handler: &BotHandler,
    chat_id: i64,
    trainer_id: i64,
    name: &str,
) -> Result<(), CommandError> {
    let feedback = CommandFeedback::new(handler.notifier.as_ref(), chat_id);

    if Trainer::find_by_id(&handler.db.pool, trainer_id).await?.is_none() {
        feedback
            .validation_error(
                &format!("Trainer {trainer_id} not found."),
                "Ask your trainer for the ID shown after /trainer",
            )
            .await?;
        return Ok(());
    }

    let client = Client::create(&handler.db.pool, trainer_id, name, chat_id).await?;
    tracing::info!("Client {} registered with trainer {}", client.id, trainer_id);

    feedback
        .success(&format!(
            "Client {} registered with trainer {}.",
            client.name, trainer_id
        ))
        .await?;
    Ok(())
}
