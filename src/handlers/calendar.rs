use axum::{
    extract::{Path, State},
    Json,
};

use crate::dto::{CalendarDay, CalendarResponse};
use crate::error::AppResult;
use crate::services::day_aggregator::{group_by_utc_day, latest_mood_per_day};
use crate::AppState;

/// Day decoration for the month calendar: latest mood per UTC day.
pub async fn get_calendar(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<CalendarResponse>> {
    let snapshot = state.hub.current(&user_id).await;
    let latest = latest_mood_per_day(&snapshot.entries);

    let days = group_by_utc_day(&snapshot.entries)
        .iter()
        .map(|(day, bucket)| {
            let symbol = latest
                .get(&day)
                .and_then(|e| e.mood())
                .map(str::to_string);
            (
                day,
                CalendarDay {
                    symbol,
                    entry_count: bucket.len(),
                },
            )
        })
        .collect();

    Ok(Json(CalendarResponse {
        revision: snapshot.revision,
        days,
    }))
}
