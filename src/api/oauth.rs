use axum::{
    extract::{Query, State},
    response::{Json, Redirect},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::database::models::{OAuthState, OAuthToken, Trainer};
use crate::error::{ApiError, ApiResult};
use crate::services::google::build_authorization_url;

const DEFAULT_TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Deserialize)]
pub struct OAuthStartParams {
    pub trainer_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OAuthConnectedResponse {
    pub status: String,
}

/// `GET /oauth/google/start?trainer_id=`: stores a fresh state token and
/// redirects to Google's consent screen.
pub async fn google_oauth_start(
    State(state): State<AppState>,
    Query(params): Query<OAuthStartParams>,
) -> ApiResult<Redirect> {
    let db = state.db()?;
    let trainer = Trainer::find_by_id(&db.pool, params.trainer_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Trainer {}", params.trainer_id)))?;

    let oauth_state = OAuthState::create(&db.pool, trainer.id).await?;
    let url = build_authorization_url(&state.config.google_oauth(), &oauth_state.state)?;

    tracing::info!("Starting Google OAuth for trainer {}", trainer.id);
    Ok(Redirect::temporary(url.as_str()))
}

/// `GET /oauth/google/callback?code=&state=`: exchanges the code and stores
/// the trainer's token. The state token is consumed in the same transaction.
pub async fn google_oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallbackParams>,
) -> ApiResult<Json<OAuthConnectedResponse>> {
    let db = state.db()?;
    let oauth_state = OAuthState::find_by_state(&db.pool, &params.state)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid OAuth state"))?;

    let grant = state.calendar.exchange_code(&params.code).await?;
    let expires_at = grant.expires_at(Utc::now())?;

    let mut tx = db.pool.begin().await?;
    OAuthToken::upsert(
        &mut *tx,
        oauth_state.trainer_id,
        &grant.access_token,
        grant.refresh_token.as_deref(),
        grant.token_type.as_deref().unwrap_or(DEFAULT_TOKEN_TYPE),
        expires_at,
    )
    .await?;
    OAuthState::delete(&mut *tx, oauth_state.id).await?;
    tx.commit().await?;

    tracing::info!("Google Calendar connected for trainer {}", oauth_state.trainer_id);
    Ok(Json(OAuthConnectedResponse {
        status: "connected".to_string(),
    }))
}
