use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::metrics;
use crate::models::{Card, CardResponse, CreateCardRequest, UpdateCardRequest};
use crate::services::templates;
use crate::utils::response::AppError;
use crate::AppState;

const CARD_COLUMNS: &str = "id, owner_id, name, profession, category, location, phone, email, \
     website, whatsapp, instagram, linkedin, youtube, template, theme_color, \
     like_count, view_count, published, created_at, updated_at";

async fn fetch_rating(
    pool: &sqlx::PgPool,
    card_id: Uuid,
) -> Result<(f64, i64), sqlx::Error> {
    let row: (f64, i64) = sqlx::query_as(
        "SELECT COALESCE(AVG(rating), 0)::float8, COUNT(*) FROM card_ratings WHERE card_id = $1",
    )
    .bind(card_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// List the template registry.
/// GET /templates
pub async fn list_templates() -> Json<&'static [templates::TemplateDescriptor]> {
    Json(templates::all())
}

/// Get a single published card.
/// GET /cards/:id
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<CardResponse>, AppError> {
    let card: Option<Card> = sqlx::query_as(&format!(
        "SELECT {} FROM cards WHERE id = $1 AND published",
        CARD_COLUMNS
    ))
    .bind(card_id)
    .fetch_optional(&state.db.pool)
    .await?;

    let card = card.ok_or_else(|| AppError::not_found("Card not found"))?;
    let (avg_rating, rating_count) = fetch_rating(&state.db.pool, card.id).await?;

    Ok(Json(CardResponse {
        card,
        avg_rating,
        rating_count,
        liked: None,
        saved: None,
        my_rating: None,
    }))
}

/// Increment a card's view counter.
/// POST /cards/:id/view
pub async fn record_view(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("UPDATE cards SET view_count = view_count + 1 WHERE id = $1")
        .bind(card_id)
        .execute(&state.db.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Card not found"));
    }

    metrics::record_card_view();
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Create a card for the authenticated user.
/// POST /cards
pub async fn create_card(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CreateCardRequest>,
) -> Result<Json<Card>, AppError> {
    req.validate()?;

    if !templates::is_valid(&req.template) {
        return Err(AppError::bad_request(&format!(
            "Unknown template: {}",
            req.template
        )));
    }

    let card: Card = sqlx::query_as(&format!(
        r#"
        INSERT INTO cards (
            owner_id, name, profession, category, location, phone, email,
            website, whatsapp, instagram, linkedin, youtube, template, theme_color
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, COALESCE($14, '#1a1a2e'))
        RETURNING {}
        "#,
        CARD_COLUMNS
    ))
    .bind(auth_user.user_id)
    .bind(&req.name)
    .bind(&req.profession)
    .bind(&req.category)
    .bind(req.location.as_deref().unwrap_or(""))
    .bind(&req.phone)
    .bind(&req.email)
    .bind(&req.website)
    .bind(&req.whatsapp)
    .bind(&req.instagram)
    .bind(&req.linkedin)
    .bind(&req.youtube)
    .bind(&req.template)
    .bind(&req.theme_color)
    .fetch_one(&state.db.pool)
    .await?;

    metrics::record_card_created();
    tracing::info!("Card {} created by {}", card.id, auth_user.user_id);

    Ok(Json(card))
}

/// Update an owned card. Unset fields keep their value.
/// PUT /cards/:id
pub async fn update_card(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
    Json(req): Json<UpdateCardRequest>,
) -> Result<Json<Card>, AppError> {
    req.validate()?;

    if let Some(template) = &req.template {
        if !templates::is_valid(template) {
            return Err(AppError::bad_request(&format!(
                "Unknown template: {}",
                template
            )));
        }
    }

    let card: Option<Card> = sqlx::query_as(&format!(
        r#"
        UPDATE cards SET
            name = COALESCE($3, name),
            profession = COALESCE($4, profession),
            category = COALESCE($5, category),
            location = COALESCE($6, location),
            phone = COALESCE($7, phone),
            email = COALESCE($8, email),
            website = COALESCE($9, website),
            whatsapp = COALESCE($10, whatsapp),
            instagram = COALESCE($11, instagram),
            linkedin = COALESCE($12, linkedin),
            youtube = COALESCE($13, youtube),
            template = COALESCE($14, template),
            theme_color = COALESCE($15, theme_color),
            published = COALESCE($16, published),
            updated_at = NOW()
        WHERE id = $1 AND owner_id = $2
        RETURNING {}
        "#,
        CARD_COLUMNS
    ))
    .bind(card_id)
    .bind(auth_user.user_id)
    .bind(&req.name)
    .bind(&req.profession)
    .bind(&req.category)
    .bind(&req.location)
    .bind(&req.phone)
    .bind(&req.email)
    .bind(&req.website)
    .bind(&req.whatsapp)
    .bind(&req.instagram)
    .bind(&req.linkedin)
    .bind(&req.youtube)
    .bind(&req.template)
    .bind(&req.theme_color)
    .bind(req.published)
    .fetch_optional(&state.db.pool)
    .await?;

    card.map(Json)
        .ok_or_else(|| AppError::not_found("Card not found"))
}

/// Delete an owned card.
/// DELETE /cards/:id
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM cards WHERE id = $1 AND owner_id = $2")
        .bind(card_id)
        .bind(auth_user.user_id)
        .execute(&state.db.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Card not found"));
    }

    tracing::info!("Card {} deleted by {}", card_id, auth_user.user_id);
    Ok(Json(serde_json::json!({ "ok": true })))
}
