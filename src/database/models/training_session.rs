use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};

const SESSION_COLUMNS: &str =
    "id, trainer_id, client_id, calendar_event_id, summary, start_time, end_time, notified_at";

/// Local record of one calendar event occurrence, keyed by the remote event id.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: i64,
    pub trainer_id: i64,
    pub client_id: Option<i64>,
    pub calendar_event_id: String,
    pub summary: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notified_at: Option<DateTime<Utc>>,
}

/// Event fields written on every sync.
#[derive(Debug, Clone)]
pub struct SessionEvent<'a> {
    pub trainer_id: i64,
    pub client_id: Option<i64>,
    pub calendar_event_id: &'a str,
    pub summary: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl TrainingSession {
    /// The session previously synced from this calendar event.
    pub async fn find_by_event_id<'e, E>(
        executor: E,
        calendar_event_id: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {SESSION_COLUMNS} FROM training_sessions WHERE calendar_event_id = ?");
        sqlx::query_as::<_, TrainingSession>(&query)
            .bind(calendar_event_id)
            .fetch_optional(executor)
            .await
    }

    /// Inserts a session for a newly seen event.
    pub async fn create<'e, E>(executor: E, event: &SessionEvent<'_>) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "INSERT INTO training_sessions (trainer_id, client_id, calendar_event_id, summary, start_time, end_time) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, TrainingSession>(&query)
            .bind(event.trainer_id)
            .bind(event.client_id)
            .bind(event.calendar_event_id)
            .bind(event.summary)
            .bind(event.start_time)
            .bind(event.end_time)
            .fetch_one(executor)
            .await
    }

    /// Overwrites summary and time range. The stored client is only replaced
    /// when the event matched one; the notification marker is never touched.
    pub async fn update_from_event<'e, E>(
        executor: E,
        id: i64,
        event: &SessionEvent<'_>,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "UPDATE training_sessions \
             SET summary = ?, start_time = ?, end_time = ?, client_id = COALESCE(?, client_id) \
             WHERE id = ? RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, TrainingSession>(&query)
            .bind(event.summary)
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(event.client_id)
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Sets the reminder marker unless it is already set.
    pub async fn mark_notified<'e, E>(
        executor: E,
        id: i64,
        notified_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE training_sessions SET notified_at = ? WHERE id = ? AND notified_at IS NULL")
            .bind(notified_at)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Sessions of every client registered from the given chat, earliest first.
    pub async fn find_for_client_chat<'e, E>(
        executor: E,
        chat_id: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, TrainingSession>(
            r#"
            SELECT s.id, s.trainer_id, s.client_id, s.calendar_event_id, s.summary,
                   s.start_time, s.end_time, s.notified_at
            FROM training_sessions s
            JOIN clients c ON s.client_id = c.id
            WHERE c.telegram_chat_id = ?
            ORDER BY s.start_time
            LIMIT ?
            "#,
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    /// All sessions of a trainer, earliest first.
    pub async fn find_by_trainer<'e, E>(
        executor: E,
        trainer_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM training_sessions WHERE trainer_id = ? ORDER BY start_time"
        );
        sqlx::query_as::<_, TrainingSession>(&query)
            .bind(trainer_id)
            .fetch_all(executor)
            .await
    }
}
