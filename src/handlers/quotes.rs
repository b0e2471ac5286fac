use axum::{
    extract::{Path, Query},
    Json,
};
use chrono::Utc;

use crate::dto::{QuoteQuery, QuoteResponse};
use crate::services::quotes::quote_of_the_day;

pub async fn get_quote(
    Path(user_id): Path<String>,
    Query(query): Query<QuoteQuery>,
) -> Json<QuoteResponse> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    Json(QuoteResponse {
        date,
        quote: quote_of_the_day(Some(&user_id), date),
    })
}
