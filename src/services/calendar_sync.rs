//! Calendar sync: pulls a trainer's Google Calendar events, upserts them as
//! training sessions, and reminds matched clients about trainings starting
//! within the next day.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqliteConnection;
use std::sync::Arc;

use crate::database::connection::DatabaseManager;
use crate::database::models::{Client, OAuthToken, SessionEvent, Trainer, TrainingSession};
use crate::services::google::{CalendarApi, GoogleError};
use crate::services::notifier::{Notifier, NotifyError};
use crate::utils::datetime::format_reminder_time;
use crate::utils::logging::log_sync_event;

/// Sessions starting within this many hours get a reminder.
pub const NOTIFY_WINDOW_HOURS: i64 = 24;

/// Why a trainer's sync did not complete.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Trainer {0} has no Google token")]
    NoToken(i64),

    #[error("Google token of trainer {0} expired and has no refresh token")]
    MissingRefreshToken(i64),

    #[error("Google API error: {0}")]
    Google(#[from] GoogleError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Lowercased client names in first-seen order. A repeated name keeps its
/// position but points at the latest client with that name.
pub struct ClientLookup<'a> {
    entries: Vec<(String, &'a Client)>,
}

impl<'a> ClientLookup<'a> {
    /// Indexes the trainer's clients by lowercased name.
    pub fn new(clients: &'a [Client]) -> Self {
        let mut entries: Vec<(String, &'a Client)> = Vec::with_capacity(clients.len());
        for client in clients {
            let key = client.name.to_lowercase();
            match entries.iter_mut().find(|(name, _)| *name == key) {
                Some(entry) => entry.1 = client,
                None => entries.push((key, client)),
            }
        }
        Self { entries }
    }

    /// First client whose name occurs in the summary, case-insensitively.
    /// No ranking: overlapping names resolve to whichever was registered first.
    pub fn find_match(&self, summary: &str) -> Option<&'a Client> {
        let summary = summary.to_lowercase();
        self.entries
            .iter()
            .find(|(name, _)| !name.is_empty() && summary.contains(name.as_str()))
            .map(|(_, client)| *client)
    }
}

/// Text of the reminder sent to a matched client.
pub fn reminder_text(start: &DateTime<Utc>, summary: &str) -> String {
    format!("⏰ Reminder: training on {} - {}", format_reminder_time(start), summary)
}

/// Runs syncs against the calendar provider and notifies through the bot.
pub struct CalendarSync {
    calendar: Arc<dyn CalendarApi>,
    notifier: Arc<dyn Notifier>,
}

impl CalendarSync {
    /// Builds a sync over the given calendar provider and notifier.
    pub fn new(calendar: Arc<dyn CalendarApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { calendar, notifier }
    }

    /// Syncs one trainer on the given connection and returns the number of
    /// events the calendar returned. The caller owns the transaction.
    pub async fn sync_trainer(
        &self,
        conn: &mut SqliteConnection,
        trainer_id: i64,
        now: DateTime<Utc>,
    ) -> Result<usize, SyncError> {
        let mut token = OAuthToken::find_by_trainer(&mut *conn, trainer_id)
            .await?
            .ok_or(SyncError::NoToken(trainer_id))?;

        if token.needs_refresh(now) {
            let refresh_token = token
                .refresh_token
                .as_deref()
                .ok_or(SyncError::MissingRefreshToken(trainer_id))?;
            let grant = self.calendar.refresh_access_token(refresh_token).await?;
            let expires_at = grant.expires_at(now)?;

            OAuthToken::update_access_token(
                &mut *conn,
                token.id,
                &grant.access_token,
                grant.refresh_token.as_deref(),
                expires_at,
            )
            .await?;
            log_sync_event(trainer_id, "refreshed access token", None);
            token.access_token = grant.access_token;
        }

        let events = self.calendar.list_events(&token.access_token).await?;
        let clients = Client::find_by_trainer(&mut *conn, trainer_id).await?;
        let lookup = ClientLookup::new(&clients);
        let notify_until = now + Duration::hours(NOTIFY_WINDOW_HOURS);
        let mut notified = 0usize;

        for event in &events {
            let Some((start_time, end_time)) = event.time_range() else {
                tracing::debug!("Skipping event {} without start/end dateTime", event.id);
                continue;
            };
            let summary = event.summary_or_default();
            let matched = lookup.find_match(summary);

            let fields = SessionEvent {
                trainer_id,
                client_id: matched.map(|client| client.id),
                calendar_event_id: &event.id,
                summary,
                start_time,
                end_time,
            };
            let session = match TrainingSession::find_by_event_id(&mut *conn, &event.id).await? {
                Some(existing) => {
                    TrainingSession::update_from_event(&mut *conn, existing.id, &fields).await?
                }
                None => TrainingSession::create(&mut *conn, &fields).await?,
            };

            let Some(client) = matched else { continue };
            if session.notified_at.is_none() && start_time >= now && start_time <= notify_until {
                self.notifier
                    .send_message(client.telegram_chat_id, &reminder_text(&start_time, summary))
                    .await?;
                TrainingSession::mark_notified(&mut *conn, session.id, now).await?;
                notified += 1;
            }
        }

        log_sync_event(
            trainer_id,
            "synced",
            Some(&format!("{} events, {} reminders", events.len(), notified)),
        );
        Ok(events.len())
    }

    /// Syncs one trainer in its own transaction, committed only on success.
    pub async fn sync_and_commit(
        &self,
        db: &DatabaseManager,
        trainer_id: i64,
        now: DateTime<Utc>,
    ) -> Result<usize, SyncError> {
        let mut tx = db.pool.begin().await?;
        let events = self.sync_trainer(&mut *tx, trainer_id, now).await?;
        tx.commit().await?;
        Ok(events)
    }

    /// Like [`CalendarSync::sync_and_commit`], also recording `last_synced_at`
    /// in the same transaction. Used by the scheduler and the `/sync` command.
    pub async fn sync_and_mark_synced(
        &self,
        db: &DatabaseManager,
        trainer_id: i64,
        now: DateTime<Utc>,
    ) -> Result<usize, SyncError> {
        let mut tx = db.pool.begin().await?;
        let events = self.sync_trainer(&mut *tx, trainer_id, now).await?;
        Trainer::mark_synced(&mut *tx, trainer_id, now).await?;
        tx.commit().await?;
        Ok(events)
    }
}
