use crate::bot::commands::CommandError;
use crate::bot::handlers::BotHandler;
use crate::database::models::Trainer;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::log_database_operation;

/// `/trainer`: registers the chat as a trainer, or reports the existing
/// registration, and sends the Google Calendar connect link.
pub async fn handle_trainer(
    handler: &BotHandler,
    chat_id: i64,
    first_name: Option<&str>,
) -> Result<(), CommandError> {
    let feedback = CommandFeedback::new(handler.notifier.as_ref(), chat_id);

    let (trainer, created) = match Trainer::find_by_chat_id(&handler.db.pool, chat_id).await? {
        Some(trainer) => (trainer, false),
        None => {
            let trainer = Trainer::create(&handler.db.pool, first_name, chat_id).await?;
            log_database_operation("INSERT", "trainers", Some(&format!("id {}", trainer.id)));
            (trainer, true)
        }
    };

    let connect_url = handler.config.oauth_start_url(trainer.id);
    let message = format!(
        "Trainer ID: {}\nConnect Google Calendar: {}",
        trainer.id, connect_url
    );

    if created {
        feedback
            .success(&format!("Done! Your trainer profile is ready.\n\n{message}"))
            .await?;
    } else {
        feedback
            .info(&format!("You are already registered as a trainer.\n\n{message}"))
            .await?;
    }
    Ok(())
}
