//! Google OAuth and Calendar v3 client.
//!
//! Only the three calls the bot needs are implemented: authorization code
//! exchange, access token refresh, and listing events of the primary calendar.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// OAuth consent endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Token endpoint for code exchange and refresh.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// `events.list` of the primary calendar.
pub const GOOGLE_EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";
/// Read-only calendar scope requested at consent.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const EVENTS_TIME_MIN: &str = "1970-01-01T00:00:00Z";
const DEFAULT_EVENT_SUMMARY: &str = "Training";

/// Failure talking to Google.
#[derive(Debug, thiserror::Error)]
pub enum GoogleError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Google API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid response from Google: {0}")]
    InvalidResponse(String),
}

/// OAuth client credentials registered with Google.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Response of the token endpoint, for both grant types.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenGrant {
    /// Absolute expiry of the granted access token, counted from `now`.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, GoogleError> {
        TimeDelta::try_seconds(self.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                GoogleError::InvalidResponse(format!("expires_in out of range: {}", self.expires_in))
            })
    }
}

/// `start`/`end` of an event. Timed events carry `dateTime`, all-day ones `date`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventTime {
    #[serde(rename = "dateTime", default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// One item of the `events.list` response. Only the fields sync reads.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: Option<EventTime>,
    #[serde(default)]
    pub end: Option<EventTime>,
}

impl CalendarEvent {
    /// Event title, or "Training" when it has none.
    pub fn summary_or_default(&self) -> &str {
        self.summary.as_deref().unwrap_or(DEFAULT_EVENT_SUMMARY)
    }

    /// Start and end instants, or `None` when either side lacks a parseable
    /// `dateTime` (all-day events only carry `date`).
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = parse_event_time(self.start.as_ref()?)?;
        let end = parse_event_time(self.end.as_ref()?)?;
        Some((start, end))
    }
}

fn parse_event_time(time: &EventTime) -> Option<DateTime<Utc>> {
    let raw = time.date_time.as_deref()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Deserialize)]
struct EventsPage {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

/// The remote calendar provider as seen by sync and the OAuth callback.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, GoogleError>;

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenGrant, GoogleError>;

    /// All single-instance events of the primary calendar ordered by start time.
    async fn list_events(&self, access_token: &str) -> Result<Vec<CalendarEvent>, GoogleError>;
}

/// Consent screen URL for the read-only calendar scope.
pub fn build_authorization_url(config: &GoogleOAuthConfig, state: &str) -> Result<Url, GoogleError> {
    let url = Url::parse_with_params(
        GOOGLE_AUTH_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", CALENDAR_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )?;
    Ok(url)
}

/// `CalendarApi` over Google's REST endpoints.
pub struct GoogleClient {
    http: Client,
    oauth: GoogleOAuthConfig,
    token_url: String,
    events_url: String,
}

impl GoogleClient {
    /// Client against the production endpoints.
    pub fn new(oauth: GoogleOAuthConfig) -> Result<Self, GoogleError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            oauth,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            events_url: GOOGLE_EVENTS_URL.to_string(),
        })
    }

    /// Points the client at different endpoints, e.g. a local mock server.
    pub fn with_endpoints(mut self, token_url: impl Into<String>, events_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self.events_url = events_url.into();
        self
    }

    async fn request_token(&self, grant: &[(&str, &str)]) -> Result<TokenGrant, GoogleError> {
        let mut form = vec![
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("redirect_uri", self.oauth.redirect_uri.as_str()),
        ];
        form.extend_from_slice(grant);

        let response = self.http.post(&self.token_url).form(&form).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<TokenGrant>().await?)
    }
}

#[async_trait]
impl CalendarApi for GoogleClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, GoogleError> {
        self.request_token(&[("grant_type", "authorization_code"), ("code", code)])
            .await
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenGrant, GoogleError> {
        self.request_token(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .await
    }

    async fn list_events(&self, access_token: &str) -> Result<Vec<CalendarEvent>, GoogleError> {
        let response = self
            .http
            .get(&self.events_url)
            .bearer_auth(access_token)
            .query(&[
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
                ("timeMin", EVENTS_TIME_MIN),
            ])
            .send()
            .await?;

        let page: EventsPage = ensure_success(response).await?.json().await?;
        Ok(page.items)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GoogleError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Google API call failed with {}: {}", status, body);
    Err(GoogleError::Status {
        status: status.as_u16(),
        body,
    })
}
