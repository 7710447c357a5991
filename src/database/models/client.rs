use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};

/// A trainer's gym member. The name is matched against calendar event summaries.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub trainer_id: i64,
    pub name: String,
    pub telegram_chat_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Registers a client for the trainer from the given chat.
    pub async fn create<'e, E>(
        executor: E,
        trainer_id: i64,
        name: &str,
        chat_id: i64,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (trainer_id, name, telegram_chat_id, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, trainer_id, name, telegram_chat_id, created_at
            "#,
        )
        .bind(trainer_id)
        .bind(name)
        .bind(chat_id)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
    }

    /// Clients of a trainer in registration order.
    pub async fn find_by_trainer<'e, E>(
        executor: E,
        trainer_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Client>(
            "SELECT id, trainer_id, name, telegram_chat_id, created_at FROM clients WHERE trainer_id = ? ORDER BY id"
        )
        .bind(trainer_id)
        .fetch_all(executor)
        .await
    }
}
