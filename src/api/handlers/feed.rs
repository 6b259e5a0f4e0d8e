use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::metrics;
use crate::models::{Ad, FeedCard};
use crate::services::feed::{build_query, sort_in_process, FeedFilter, FeedSort};
use crate::services::interleave::{interleave, FeedItem};
use crate::utils::response::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub search: Option<String>,
    /// Comma-separated occupation values.
    pub occupation: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    /// Comma-separated state values.
    pub state: Option<String>,
    /// Comma-separated country values.
    pub country: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub items: Vec<FeedItem>,
    pub card_count: usize,
}

fn split_csv(value: Option<&String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

type FeedRow = (
    Uuid,
    String,
    String,
    String,
    String,
    String,
    String,
    i64,
    i64,
    f64,
    i64,
    DateTime<Utc>,
);

/// Visitor-facing card feed with ads interleaved.
/// GET /cards
pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, AppError> {
    let sort = query
        .sort
        .as_deref()
        .and_then(FeedSort::parse)
        .unwrap_or_default();

    let filter = FeedFilter {
        search: query.search.unwrap_or_default(),
        occupation: split_csv(query.occupation.as_ref()),
        category: query.category,
        area: query.area.unwrap_or_default(),
        state: split_csv(query.state.as_ref()),
        country: split_csv(query.country.as_ref()),
        sort,
    };

    let limit = query.limit.unwrap_or(60).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let mut qb = build_query(&filter, limit, offset);
    let cards_fut = qb.build_query_as::<FeedRow>().fetch_all(&state.db.pool);
    let ads_fut = sqlx::query_as::<_, Ad>(
        "SELECT id, title, image_url, link_url, important, repeat_interval, active, created_at \
         FROM ads WHERE active ORDER BY created_at",
    )
    .fetch_all(&state.db.pool);

    // Cards and ads are independent fetches.
    let (rows, ads) = futures::try_join!(cards_fut, ads_fut)?;

    let mut cards: Vec<FeedCard> = rows
        .into_iter()
        .map(
            |(
                id,
                name,
                profession,
                category,
                location,
                template,
                theme_color,
                like_count,
                view_count,
                avg_rating,
                rating_count,
                created_at,
            )| FeedCard {
                id,
                name,
                profession,
                category,
                location,
                template,
                theme_color,
                like_count,
                view_count,
                avg_rating,
                rating_count,
                created_at,
            },
        )
        .collect();

    sort_in_process(&mut cards, sort);

    let card_count = cards.len();
    let items = interleave(cards, &ads, state.config.ad_slot_interval);

    let injected = items.len() - card_count;
    if injected > 0 {
        metrics::record_ads_injected(injected as u64);
    }

    Ok(Json(FeedResponse { items, card_count }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_csv_drops_empty_segments() {
        let raw = "Maharashtra, Goa,,  ".to_string();
        assert_eq!(split_csv(Some(&raw)), vec!["Maharashtra", "Goa"]);
        assert!(split_csv(None).is_empty());
    }
}
