use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::metrics;
use crate::models::{RateCardRequest, RatingSummary, ToggleResponse};
use crate::services::interactions::{OptimisticToggle, ToggleState};
use crate::utils::response::AppError;
use crate::AppState;

const LIKE_INSERT: &str = "INSERT INTO card_likes (card_id, user_id) VALUES ($1, $2) \
     ON CONFLICT (card_id, user_id) DO NOTHING";
const LIKE_DELETE: &str = "DELETE FROM card_likes WHERE card_id = $1 AND user_id = $2";

// The counter adjusts in place rather than writing an absolute value:
// two concurrent likers would otherwise both persist the same stale
// snapshot and lose one increment.
const LIKE_COUNT_INCREMENT: &str =
    "UPDATE cards SET like_count = like_count + 1 WHERE id = $1 RETURNING like_count";
const LIKE_COUNT_DECREMENT: &str =
    "UPDATE cards SET like_count = GREATEST(like_count - 1, 0) WHERE id = $1 RETURNING like_count";

/// Toggle a like: insert-or-delete plus the denormalized counter, in
/// one transaction. A failed write leaves both untouched, so the
/// response always reflects the request's own outcome.
/// POST /cards/:id/like
pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let mut tx = state.db.pool.begin().await.map_err(AppError::from)?;

    let current: Option<(bool, i64)> = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM card_likes WHERE card_id = $1 AND user_id = $2
        ), like_count
        FROM cards WHERE id = $1
        "#,
    )
    .bind(card_id)
    .bind(auth_user.user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let (liked, like_count) = current.ok_or_else(|| AppError::not_found("Card not found"))?;
    let toggle = OptimisticToggle::begin(ToggleState::new(liked, like_count));

    let row_sql = if liked { LIKE_DELETE } else { LIKE_INSERT };
    let changed = sqlx::query(row_sql)
        .bind(card_id)
        .bind(auth_user.user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
        == 1;

    // The counter moves only when this request actually changed a row;
    // a concurrent toggle that got there first already adjusted it.
    let like_count: i64 = if changed {
        let count_sql = if liked {
            LIKE_COUNT_DECREMENT
        } else {
            LIKE_COUNT_INCREMENT
        };
        sqlx::query_scalar(count_sql)
            .bind(card_id)
            .fetch_one(&mut *tx)
            .await?
    } else {
        sqlx::query_scalar("SELECT like_count FROM cards WHERE id = $1")
            .bind(card_id)
            .fetch_one(&mut *tx)
            .await?
    };

    tx.commit().await?;

    let confirmed = toggle.confirm();
    metrics::record_like_toggle(confirmed.active);

    Ok(Json(ToggleResponse {
        active: confirmed.active,
        like_count: Some(like_count),
    }))
}

/// Toggle a save. Same transactional shape as `toggle_like`, minus
/// the counter.
/// POST /cards/:id/save
pub async fn toggle_save(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let mut tx = state.db.pool.begin().await.map_err(AppError::from)?;

    let current: Option<bool> = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM card_saves WHERE card_id = $1 AND user_id = $2
        )
        FROM cards WHERE id = $1 AND published
        "#,
    )
    .bind(card_id)
    .bind(auth_user.user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let saved = current.ok_or_else(|| AppError::not_found("Card not found"))?;

    if saved {
        sqlx::query("DELETE FROM card_saves WHERE card_id = $1 AND user_id = $2")
            .bind(card_id)
            .bind(auth_user.user_id)
            .execute(&mut *tx)
            .await?;
    } else {
        sqlx::query(
            "INSERT INTO card_saves (card_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (card_id, user_id) DO NOTHING",
        )
        .bind(card_id)
        .bind(auth_user.user_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    metrics::record_save_toggle(!saved);

    Ok(Json(ToggleResponse {
        active: !saved,
        like_count: None,
    }))
}

const RATING_UPSERT: &str = r#"
INSERT INTO card_ratings (card_id, user_id, rating)
VALUES ($1, $2, $3)
ON CONFLICT (card_id, user_id)
DO UPDATE SET rating = EXCLUDED.rating, updated_at = NOW()
"#;

const RATING_SUMMARY: &str =
    "SELECT COALESCE(AVG(rating), 0)::float8, COUNT(*) FROM card_ratings WHERE card_id = $1";

/// Upsert the viewer's rating. Keyed on (card, user), so a retried
/// submission is idempotent and never inflates the rating count.
/// PUT /cards/:id/rating
pub async fn rate_card(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
    Json(req): Json<RateCardRequest>,
) -> Result<Json<RatingSummary>, AppError> {
    req.validate()?;

    sqlx::query(RATING_UPSERT)
    .bind(card_id)
    .bind(auth_user.user_id)
    .bind(req.rating)
    .execute(&state.db.pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::not_found("Card not found")
        }
        _ => AppError::from(e),
    })?;

    metrics::record_rating_submitted();

    let summary = rating_summary(&state.db.pool, card_id).await?;
    Ok(Json(summary))
}

/// Public rating aggregate for a card.
/// GET /cards/:id/rating
pub async fn get_rating(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<RatingSummary>, AppError> {
    let summary = rating_summary(&state.db.pool, card_id).await?;
    Ok(Json(summary))
}

/// The viewer's own interaction state for a card, used to seed the
/// client's optimistic toggles.
/// GET /cards/:id/interactions
#[derive(Debug, Serialize)]
pub struct InteractionState {
    pub liked: bool,
    pub saved: bool,
    pub my_rating: Option<i32>,
}

pub async fn get_interactions(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<InteractionState>, AppError> {
    let row: (bool, bool, Option<i32>) = sqlx::query_as(
        r#"
        SELECT
            EXISTS (SELECT 1 FROM card_likes WHERE card_id = $1 AND user_id = $2),
            EXISTS (SELECT 1 FROM card_saves WHERE card_id = $1 AND user_id = $2),
            (SELECT rating FROM card_ratings WHERE card_id = $1 AND user_id = $2)
        "#,
    )
    .bind(card_id)
    .bind(auth_user.user_id)
    .fetch_one(&state.db.pool)
    .await?;

    Ok(Json(InteractionState {
        liked: row.0,
        saved: row.1,
        my_rating: row.2,
    }))
}

async fn rating_summary(
    pool: &sqlx::PgPool,
    card_id: Uuid,
) -> Result<RatingSummary, AppError> {
    let (avg_rating, rating_count): (f64, i64) = sqlx::query_as(RATING_SUMMARY)
        .bind(card_id)
        .fetch_one(pool)
        .await?;

    Ok(RatingSummary {
        avg_rating,
        rating_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_counter_moves_relatively() {
        // An absolute write would let two concurrent likers persist the
        // same stale snapshot and lose one increment.
        assert!(LIKE_COUNT_INCREMENT.contains("like_count = like_count + 1"));
        assert!(LIKE_COUNT_DECREMENT.contains("GREATEST(like_count - 1, 0)"));
        assert!(LIKE_INSERT.contains("ON CONFLICT (card_id, user_id) DO NOTHING"));
    }

    #[test]
    fn test_rating_resubmission_is_an_upsert() {
        assert!(RATING_UPSERT.contains("ON CONFLICT (card_id, user_id)"));
        assert!(RATING_UPSERT.contains("DO UPDATE SET rating = EXCLUDED.rating"));
    }

    #[test]
    fn test_rating_count_is_derived_not_stored() {
        // A retried identical submission cannot inflate a COUNT(*).
        assert!(RATING_SUMMARY.contains("COUNT(*)"));
        assert!(!RATING_SUMMARY.contains("rating_count"));
    }
}
