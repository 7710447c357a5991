use anyhow::{anyhow, Result};
use std::env;

use crate::services::google::GoogleOAuthConfig;

const DEFAULT_REDIRECT_URI: &str = "https://example.com/oauth/google/callback";
const DEFAULT_PUBLIC_BASE_URL: &str = "https://example.com";

/// Process-wide settings, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token; empty disables outbound Telegram messages.
    pub telegram_bot_token: String,
    /// Path secret expected on `/tg/webhook/{secret}`; empty rejects every call.
    pub telegram_webhook_secret: String,
    /// `None` when no database is configured.
    pub database_url: Option<String>,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    /// Externally reachable base URL, without a trailing slash.
    pub public_base_url: String,
    pub auto_migrate: bool,
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        let telegram_webhook_secret = env::var("TELEGRAM_WEBHOOK_SECRET").unwrap_or_default();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let google_redirect_uri = env::var("GOOGLE_REDIRECT_URI")
            .ok()
            .filter(|uri| !uri.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let auto_migrate = match env::var("AUTO_MIGRATE") {
            Ok(value) => parse_flag(&value).ok_or_else(|| anyhow!("Invalid AUTO_MIGRATE"))?,
            Err(_) => true,
        };

        let port_str = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        Ok(Config {
            telegram_bot_token,
            telegram_webhook_secret,
            database_url,
            google_client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            google_redirect_uri,
            public_base_url,
            auto_migrate,
            http_port,
        })
    }

    /// Credentials used for both the consent redirect and the token endpoint.
    pub fn google_oauth(&self) -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            client_id: self.google_client_id.clone(),
            client_secret: self.google_client_secret.clone(),
            redirect_uri: self.google_redirect_uri.clone(),
        }
    }

    /// Link a trainer follows to connect their Google Calendar.
    pub fn oauth_start_url(&self, trainer_id: i64) -> String {
        format!("{}/oauth/google/start?trainer_id={}", self.public_base_url, trainer_id)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
