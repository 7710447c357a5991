use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::bot::handlers::BotHandler;
use crate::bot::update::TelegramUpdate;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct TelegramOkResponse {
    pub ok: bool,
}

/// `POST /tg/webhook/{secret}`. The secret is checked before the body is
/// parsed; an unset secret rejects every call.
pub async fn telegram_webhook(
    State(state): State<AppState>,
    Path(secret): Path<String>,
    body: Bytes,
) -> ApiResult<Json<TelegramOkResponse>> {
    let expected = &state.config.telegram_webhook_secret;
    if expected.is_empty() || secret != *expected {
        return Err(ApiError::not_found("Webhook"));
    }

    let Json(update) = Json::<TelegramUpdate>::from_bytes(&body)
        .map_err(|e| ApiError::bad_request(e.body_text()))?;
    tracing::debug!("telegram_update={:?}", update);

    let ok = Json(TelegramOkResponse { ok: true });
    let Some(message) = update.into_message() else {
        return Ok(ok);
    };
    if message.text.is_none() {
        return Ok(ok);
    }

    let handler = BotHandler::new(
        state.db()?.clone(),
        state.notifier.clone(),
        state.sync.clone(),
        state.config.clone(),
    );
    handler.handle_message(&message).await?;
    Ok(ok)
}
