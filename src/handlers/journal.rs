use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::dto::{JournalQuery, JournalResponse};
use crate::error::AppResult;
use crate::services::journal::{filter_entries, group_for_journal};
use crate::AppState;

pub async fn get_journal(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<JournalQuery>,
) -> AppResult<Response> {
    query.validate()?;

    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let snapshot = state.hub.current(&user_id).await;

    let matched = filter_entries(
        &snapshot.entries,
        &query.mood_symbols(),
        query.q.as_deref().unwrap_or_default(),
    );
    let response = JournalResponse {
        revision: snapshot.revision,
        total: snapshot.entries.len(),
        matched: matched.len(),
        groups: group_for_journal(&matched, today),
    };

    // Response borrows the snapshot, so serialize before it goes out of scope
    Ok(Json(response).into_response())
}
