//! HTTP surface: health probes, the Telegram webhook, the Google OAuth
//! redirect pair and the manual sync trigger.

pub mod calendar;
pub mod health;
pub mod oauth;
pub mod webhook;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::error::ApiError;
use crate::services::calendar_sync::CalendarSync;
use crate::services::google::CalendarApi;
use crate::services::notifier::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when `DATABASE_URL` is not set.
    pub db: Option<DatabaseManager>,
    pub calendar: Arc<dyn CalendarApi>,
    pub notifier: Arc<dyn Notifier>,
    pub sync: Arc<CalendarSync>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        db: Option<DatabaseManager>,
        calendar: Arc<dyn CalendarApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let sync = Arc::new(CalendarSync::new(calendar.clone(), notifier.clone()));
        Self {
            config,
            db,
            calendar,
            notifier,
            sync,
        }
    }

    pub fn db(&self) -> Result<&DatabaseManager, ApiError> {
        self.db.as_ref().ok_or(ApiError::DatabaseUnavailable)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/tg/webhook/:secret", post(webhook::telegram_webhook))
        .route("/oauth/google/start", get(oauth::google_oauth_start))
        .route("/oauth/google/callback", get(oauth::google_oauth_callback))
        .route("/calendar/sync/:trainer_id", post(calendar::sync_calendar))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
