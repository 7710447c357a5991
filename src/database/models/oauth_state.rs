use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};
use uuid::Uuid;

/// Anti-forgery token binding a consent redirect to a trainer. Consumed by the callback.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OAuthState {
    pub id: i64,
    pub trainer_id: i64,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

impl OAuthState {
    /// Issues a fresh random state for the trainer.
    pub async fn create<'e, E>(executor: E, trainer_id: i64) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let state = Uuid::new_v4().simple().to_string();

        sqlx::query_as::<_, OAuthState>(
            "INSERT INTO oauth_states (trainer_id, state, created_at) VALUES (?, ?, ?) RETURNING id, trainer_id, state, created_at"
        )
        .bind(trainer_id)
        .bind(&state)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
    }

    /// Looks up a state token returned by the consent redirect.
    pub async fn find_by_state<'e, E>(executor: E, state: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, OAuthState>(
            "SELECT id, trainer_id, state, created_at FROM oauth_states WHERE state = ?"
        )
        .bind(state)
        .fetch_optional(executor)
        .await
    }

    /// Consumes the state.
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("DELETE FROM oauth_states WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
