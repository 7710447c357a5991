use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};

/// Tokens expiring within this window are refreshed before use.
pub const TOKEN_REFRESH_MARGIN_SECONDS: i64 = 60;

const TOKEN_COLUMNS: &str = "id, trainer_id, access_token, refresh_token, token_type, expires_at";

/// Google credentials of a trainer. At most one row per trainer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OAuthToken {
    pub id: i64,
    pub trainer_id: i64,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl OAuthToken {
    /// True once the token is within the refresh margin of expiring.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECONDS)
    }

    /// The trainer's stored token, if Google was connected.
    pub async fn find_by_trainer<'e, E>(
        executor: E,
        trainer_id: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {TOKEN_COLUMNS} FROM oauth_tokens WHERE trainer_id = ?");
        sqlx::query_as::<_, OAuthToken>(&query)
            .bind(trainer_id)
            .fetch_optional(executor)
            .await
    }

    /// Stores the trainer's token, replacing any previous one. A missing
    /// refresh token keeps the one already stored.
    pub async fn upsert<'e, E>(
        executor: E,
        trainer_id: i64,
        access_token: &str,
        refresh_token: Option<&str>,
        token_type: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            r#"
            INSERT INTO oauth_tokens (trainer_id, access_token, refresh_token, token_type, expires_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(trainer_id) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = COALESCE(excluded.refresh_token, oauth_tokens.refresh_token),
                token_type = excluded.token_type,
                expires_at = excluded.expires_at
            RETURNING {TOKEN_COLUMNS}
            "#
        );
        sqlx::query_as::<_, OAuthToken>(&query)
            .bind(trainer_id)
            .bind(access_token)
            .bind(refresh_token)
            .bind(token_type)
            .bind(expires_at)
            .fetch_one(executor)
            .await
    }

    /// Records a refreshed access token in place.
    pub async fn update_access_token<'e, E>(
        executor: E,
        id: i64,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "UPDATE oauth_tokens SET access_token = ?, refresh_token = COALESCE(?, refresh_token), expires_at = ? WHERE id = ?"
        )
        .bind(access_token)
        .bind(refresh_token)
        .bind(expires_at)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_expiring_at(expires_at: DateTime<Utc>) -> OAuthToken {
        OAuthToken {
            id: 1,
            trainer_id: 1,
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            token_type: "Bearer".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_refresh_needed_inside_margin() {
        let now = Utc::now();
        assert!(token_expiring_at(now - Duration::minutes(5)).needs_refresh(now));
        assert!(token_expiring_at(now + Duration::seconds(30)).needs_refresh(now));
        assert!(token_expiring_at(now + Duration::seconds(60)).needs_refresh(now));
    }

    #[test]
    fn test_refresh_not_needed_outside_margin() {
        let now = Utc::now();
        assert!(!token_expiring_at(now + Duration::seconds(61)).needs_refresh(now));
        assert!(!token_expiring_at(now + Duration::hours(1)).needs_refresh(now));
    }
}
