use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::dto::{clamp_window_days, ComputeStatsRequest, StatsQuery, StatsResponse, StatsView};
use crate::error::AppResult;
use crate::services::trends::build_stats;
use crate::services::vocabulary::Vocabulary;
use crate::AppState;

pub async fn get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<StatsResponse>> {
    query.validate()?;

    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let window_days = clamp_window_days(query.days, state.hub.default_window_days());
    let snapshot = state.hub.current(&user_id).await;

    let stats = build_stats(
        &snapshot.entries,
        &snapshot.vocabulary(),
        state.hub.stats_options(today, window_days),
    );
    tracing::debug!(
        user_id = %user_id,
        revision = snapshot.revision,
        entries = snapshot.entries.len(),
        has_data = stats.is_some(),
        "Stats recomputed"
    );

    Ok(Json(StatsResponse {
        revision: snapshot.revision,
        today,
        view: StatsView::from(stats),
    }))
}

/// Stateless variant: the caller ships entries and vocabulary inline.
pub async fn compute_stats(
    State(state): State<AppState>,
    Json(body): Json<ComputeStatsRequest>,
) -> AppResult<Json<StatsResponse>> {
    body.validate()?;
    Vocabulary::validate_override(&body.moods)?;

    let today = body.today.unwrap_or_else(|| Utc::now().date_naive());
    let window_days = clamp_window_days(body.days, state.hub.default_window_days());
    let vocabulary = Vocabulary::effective(Some(body.moods.as_slice()));

    let stats = build_stats(
        &body.entries,
        &vocabulary,
        state.hub.stats_options(today, window_days),
    );

    Ok(Json(StatsResponse {
        revision: 0,
        today,
        view: StatsView::from(stats),
    }))
}
