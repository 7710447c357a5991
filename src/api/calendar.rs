use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::error::ApiResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarSyncResponse {
    pub status: String,
    pub events: usize,
}

/// `POST /calendar/sync/{trainer_id}`: syncs one trainer immediately.
pub async fn sync_calendar(
    State(state): State<AppState>,
    Path(trainer_id): Path<i64>,
) -> ApiResult<Json<CalendarSyncResponse>> {
    let db = state.db()?;
    let events = state.sync.sync_and_commit(db, trainer_id, Utc::now()).await?;

    Ok(Json(CalendarSyncResponse {
        status: "synced".to_string(),
        events,
    }))
}
