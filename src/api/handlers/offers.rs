use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::models::{CreateOfferRequest, Offer};
use crate::utils::response::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct OffersResponse {
    pub offers: Vec<Offer>,
    pub total: usize,
}

/// List active offers, newest first.
/// GET /offers
pub async fn list_offers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OffersResponse>, AppError> {
    let offers: Vec<Offer> = sqlx::query_as(
        r#"
        SELECT id, owner_id, card_id, title, description, image_url, active, created_at
        FROM offers
        WHERE active
        ORDER BY created_at DESC
        LIMIT 100
        "#,
    )
    .fetch_all(&state.db.pool)
    .await?;

    let total = offers.len();
    Ok(Json(OffersResponse { offers, total }))
}

/// Create an offer, optionally linked to one of the owner's cards.
/// POST /offers
pub async fn create_offer(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CreateOfferRequest>,
) -> Result<Json<Offer>, AppError> {
    req.validate()?;

    if let Some(card_id) = req.card_id {
        let owns: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM cards WHERE id = $1 AND owner_id = $2)",
        )
        .bind(card_id)
        .bind(auth_user.user_id)
        .fetch_one(&state.db.pool)
        .await?;

        if !owns {
            return Err(AppError::bad_request("Linked card is not yours"));
        }
    }

    let offer: Offer = sqlx::query_as(
        r#"
        INSERT INTO offers (owner_id, card_id, title, description, image_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, owner_id, card_id, title, description, image_url, active, created_at
        "#,
    )
    .bind(auth_user.user_id)
    .bind(req.card_id)
    .bind(&req.title)
    .bind(req.description.as_deref().unwrap_or(""))
    .bind(&req.image_url)
    .fetch_one(&state.db.pool)
    .await?;

    tracing::info!("Offer {} created by {}", offer.id, auth_user.user_id);
    Ok(Json(offer))
}

/// Delete an owned offer.
/// DELETE /offers/:id
pub async fn delete_offer(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM offers WHERE id = $1 AND owner_id = $2")
        .bind(offer_id)
        .bind(auth_user.user_id)
        .execute(&state.db.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Offer not found"));
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}
