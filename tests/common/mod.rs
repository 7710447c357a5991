//! Shared fixtures: temporary databases and in-memory stand-ins for Google
//! Calendar and Telegram.
#![allow(dead_code, clippy::unwrap_used)]

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Timelike, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

use cozy_gym_bot::api::{self, AppState};
use cozy_gym_bot::config::Config;
use cozy_gym_bot::database::connection::DatabaseManager;
use cozy_gym_bot::database::models::{OAuthToken, Trainer};
use cozy_gym_bot::services::calendar_sync::CalendarSync;
use cozy_gym_bot::services::google::{CalendarApi, CalendarEvent, EventTime, GoogleError, TokenGrant};
use cozy_gym_bot::services::notifier::{Notifier, NotifyError};

pub const WEBHOOK_SECRET: &str = "hook-secret";

pub async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

/// Current time without sub-second precision, so values survive a
/// database round trip unchanged.
pub fn now() -> DateTime<Utc> {
    Utc::now().with_nanosecond(0).unwrap()
}

pub fn event(id: &str, summary: Option<&str>, start: DateTime<Utc>) -> CalendarEvent {
    let end = start + Duration::hours(1);
    CalendarEvent {
        id: id.to_string(),
        summary: summary.map(String::from),
        start: Some(EventTime {
            date_time: Some(start.to_rfc3339()),
            date: None,
        }),
        end: Some(EventTime {
            date_time: Some(end.to_rfc3339()),
            date: None,
        }),
    }
}

pub fn all_day_event(id: &str, summary: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        start: Some(EventTime {
            date_time: None,
            date: Some("2026-03-01".to_string()),
        }),
        end: Some(EventTime {
            date_time: None,
            date: Some("2026-03-02".to_string()),
        }),
    }
}

/// Registers a trainer with a stored Google token.
pub async fn trainer_with_token(
    db: &DatabaseManager,
    chat_id: i64,
    expires_at: DateTime<Utc>,
    refresh_token: Option<&str>,
) -> Result<Trainer> {
    let trainer = Trainer::create(&db.pool, Some("Coach"), chat_id).await?;
    OAuthToken::upsert(
        &db.pool,
        trainer.id,
        "stored-access",
        refresh_token,
        "Bearer",
        expires_at,
    )
    .await?;
    Ok(trainer)
}

pub const REFRESHED_ACCESS_TOKEN: &str = "refreshed-access";

#[derive(Default)]
pub struct FakeCalendar {
    events: Mutex<Vec<CalendarEvent>>,
    tokens_seen: Mutex<Vec<String>>,
    refresh_calls: AtomicUsize,
    fail_listing: AtomicBool,
    expires_in: Mutex<Option<i64>>,
}

impl FakeCalendar {
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        let fake = Self::default();
        fake.set_events(events);
        fake
    }

    pub fn set_events(&self, events: Vec<CalendarEvent>) {
        *self.events.lock().unwrap() = events;
    }

    /// Overrides the `expires_in` of every grant, 3600 otherwise.
    pub fn set_expires_in(&self, seconds: i64) {
        *self.expires_in.lock().unwrap() = Some(seconds);
    }

    fn grant_lifetime(&self) -> i64 {
        self.expires_in.lock().unwrap().unwrap_or(3600)
    }

    pub fn fail_listing(&self) {
        self.fail_listing.store(true, Ordering::SeqCst);
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Access tokens `list_events` was called with, in order.
    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarApi for FakeCalendar {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, GoogleError> {
        if code == "bad-code" {
            return Err(GoogleError::Status {
                status: 400,
                body: "invalid_grant".to_string(),
            });
        }
        Ok(TokenGrant {
            access_token: format!("access-for-{code}"),
            expires_in: self.grant_lifetime(),
            refresh_token: Some("refresh-from-code".to_string()),
            token_type: Some("Bearer".to_string()),
        })
    }

    async fn refresh_access_token(&self, _refresh_token: &str) -> Result<TokenGrant, GoogleError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TokenGrant {
            access_token: REFRESHED_ACCESS_TOKEN.to_string(),
            expires_in: self.grant_lifetime(),
            refresh_token: None,
            token_type: None,
        })
    }

    async fn list_events(&self, access_token: &str) -> Result<Vec<CalendarEvent>, GoogleError> {
        self.tokens_seen.lock().unwrap().push(access_token.to_string());
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(GoogleError::Status {
                status: 500,
                body: "backend error".to_string(),
            });
        }
        Ok(self.events.lock().unwrap().clone())
    }
}

/// Collects outbound messages instead of sending them.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn last_to(&self, chat_id: i64) -> Option<String> {
        self.sent_to(chat_id).pop()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

pub fn calendar_sync(calendar: &Arc<FakeCalendar>, notifier: &Arc<RecordingNotifier>) -> CalendarSync {
    CalendarSync::new(calendar.clone(), notifier.clone())
}

pub fn test_config(database_url: Option<String>) -> Config {
    Config {
        telegram_bot_token: String::new(),
        telegram_webhook_secret: WEBHOOK_SECRET.to_string(),
        database_url,
        google_client_id: "client-id".to_string(),
        google_client_secret: "client-secret".to_string(),
        google_redirect_uri: "https://gym.example.com/oauth/google/callback".to_string(),
        public_base_url: "https://gym.example.com".to_string(),
        auto_migrate: true,
        http_port: 3000,
    }
}

/// A router wired to a fresh database and the fakes.
pub struct TestApp {
    pub server: axum_test::TestServer,
    pub db: DatabaseManager,
    pub calendar: Arc<FakeCalendar>,
    pub notifier: Arc<RecordingNotifier>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let (db, temp_dir) = setup_test_db().await?;
        let calendar = Arc::new(FakeCalendar::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let state = AppState::new(
            Arc::new(test_config(Some("sqlite::memory:".to_string()))),
            Some(db.clone()),
            calendar.clone(),
            notifier.clone(),
        );
        let server = axum_test::TestServer::new(api::router(state))?;

        Ok(Self {
            server,
            db,
            calendar,
            notifier,
            _temp_dir: temp_dir,
        })
    }

    /// Posts a text message from `chat_id` to the webhook and asserts the
    /// webhook acknowledged it.
    pub async fn send_text(&self, chat_id: i64, text: &str) {
        let response = self
            .server
            .post(&format!("/tg/webhook/{WEBHOOK_SECRET}"))
            .json(&serde_json::json!({
                "update_id": 1,
                "message": {
                    "message_id": 10,
                    "chat": { "id": chat_id, "type": "private" },
                    "from": { "id": chat_id, "first_name": "Anna" },
                    "text": text,
                }
            }))
            .await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({ "ok": true }));
    }
}
