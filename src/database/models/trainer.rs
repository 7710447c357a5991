use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};

/// Interval applied to trainers that never configured one.
pub const DEFAULT_SYNC_INTERVAL_MINUTES: i64 = 60;

const TRAINER_COLUMNS: &str =
    "id, name, telegram_chat_id, sync_enabled, sync_interval_minutes, last_synced_at, created_at";

/// A registered trainer and their auto-sync settings.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Trainer {
    pub id: i64,
    pub name: Option<String>,
    pub telegram_chat_id: i64,
    pub sync_enabled: bool,
    pub sync_interval_minutes: i64,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Trainer {
    /// When the next automatic sync becomes due. A trainer that was never
    /// synced is due immediately. `None` when the interval pushes the due
    /// time past what `DateTime` can represent.
    pub fn next_sync_due(&self) -> Option<DateTime<Utc>> {
        let last = self.last_synced_at.unwrap_or(DateTime::UNIX_EPOCH);
        Duration::try_minutes(self.sync_interval_minutes)
            .and_then(|interval| last.checked_add_signed(interval))
    }

    /// An unrepresentable due time is never due.
    pub fn is_sync_due(&self, now: DateTime<Utc>) -> bool {
        self.next_sync_due().is_some_and(|due| now >= due)
    }

    /// Inserts a trainer with auto-sync off and the default interval.
    pub async fn create<'e, E>(
        executor: E,
        name: Option<&str>,
        chat_id: i64,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "INSERT INTO trainers (name, telegram_chat_id, sync_enabled, sync_interval_minutes, created_at) \
             VALUES (?, ?, 0, ?, ?) RETURNING {TRAINER_COLUMNS}"
        );
        sqlx::query_as::<_, Trainer>(&query)
            .bind(name)
            .bind(chat_id)
            .bind(DEFAULT_SYNC_INTERVAL_MINUTES)
            .bind(Utc::now())
            .fetch_one(executor)
            .await
    }

    /// Looks a trainer up by primary key.
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {TRAINER_COLUMNS} FROM trainers WHERE id = ?");
        sqlx::query_as::<_, Trainer>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Looks a trainer up by their Telegram chat.
    pub async fn find_by_chat_id<'e, E>(
        executor: E,
        chat_id: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {TRAINER_COLUMNS} FROM trainers WHERE telegram_chat_id = ?");
        sqlx::query_as::<_, Trainer>(&query)
            .bind(chat_id)
            .fetch_optional(executor)
            .await
    }

    /// Trainers with auto-sync on, ordered by id.
    pub async fn list_sync_enabled<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {TRAINER_COLUMNS} FROM trainers WHERE sync_enabled = 1 ORDER BY id");
        sqlx::query_as::<_, Trainer>(&query)
            .fetch_all(executor)
            .await
    }

    /// Turns automatic sync on with the given interval, clamped to at least one minute.
    pub async fn enable_auto_sync<'e, E>(
        executor: E,
        id: i64,
        minutes: i64,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "UPDATE trainers SET sync_enabled = 1, sync_interval_minutes = ? WHERE id = ? RETURNING {TRAINER_COLUMNS}"
        );
        sqlx::query_as::<_, Trainer>(&query)
            .bind(minutes.max(1))
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Turns automatic sync off, leaving the configured interval untouched.
    pub async fn disable_auto_sync<'e, E>(executor: E, id: i64) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("UPDATE trainers SET sync_enabled = 0 WHERE id = ? RETURNING {TRAINER_COLUMNS}");
        sqlx::query_as::<_, Trainer>(&query)
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Records the time of the last successful sync.
    pub async fn mark_synced<'e, E>(
        executor: E,
        id: i64,
        synced_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE trainers SET last_synced_at = ? WHERE id = ?")
            .bind(synced_at)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn trainer(last_synced_at: Option<DateTime<Utc>>, interval: i64) -> Trainer {
        Trainer {
            id: 1,
            name: Some("Anna".to_string()),
            telegram_chat_id: 100,
            sync_enabled: true,
            sync_interval_minutes: interval,
            last_synced_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_never_synced_trainer_is_due() {
        let t = trainer(None, 60);
        assert!(t.is_sync_due(Utc::now()));
        assert_eq!(t.next_sync_due(), Some(DateTime::UNIX_EPOCH + Duration::minutes(60)));
    }

    #[test]
    fn test_due_only_after_interval_elapsed() {
        let last = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let t = trainer(Some(last), 30);

        assert!(!t.is_sync_due(last + Duration::minutes(29)));
        assert!(t.is_sync_due(last + Duration::minutes(30)));
        assert!(t.is_sync_due(last + Duration::hours(2)));
    }

    #[test]
    fn test_out_of_range_interval_is_never_due() {
        let last = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();

        let huge = trainer(Some(last), 200_000_000_000);
        assert_eq!(huge.next_sync_due(), None);
        assert!(!huge.is_sync_due(last + Duration::days(365)));

        let max = trainer(None, i64::MAX);
        assert_eq!(max.next_sync_due(), None);
        assert!(!max.is_sync_due(Utc::now()));
    }
}
