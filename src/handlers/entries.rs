use axum::{
    extract::{Path, State},
    Json,
};

use crate::dto::{ReplaceEntriesRequest, SnapshotAckResponse};
use crate::error::AppResult;
use crate::services::day_aggregator::group_by_utc_day;
use crate::AppState;

/// Full snapshot replacement, sent by the storage side on every change.
pub async fn replace_entries(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<ReplaceEntriesRequest>,
) -> AppResult<Json<SnapshotAckResponse>> {
    let snapshot = state.hub.replace_entries(&user_id, body.entries).await?;
    let unbucketed = group_by_utc_day(&snapshot.entries).unbucketed();

    Ok(Json(SnapshotAckResponse {
        user_id,
        revision: snapshot.revision,
        entries: snapshot.entries.len(),
        unbucketed,
    }))
}
