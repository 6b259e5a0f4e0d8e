use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::models::{Card, Offer, Profile, ProfileResponse, UpdateProfileRequest};
use crate::utils::response::AppError;
use crate::AppState;

/// Get the authenticated user's profile.
/// GET /account/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile: Option<Profile> = sqlx::query_as(
        r#"
        SELECT user_id, display_name, verified, premium_plan,
               subscription_expiry, created_at, updated_at
        FROM profiles
        WHERE user_id = $1
        "#,
    )
    .bind(auth_user.user_id)
    .fetch_optional(&state.db.pool)
    .await?;

    let profile = profile.ok_or_else(|| AppError::not_found("Profile not found"))?;

    let (email, username): (String, String) =
        sqlx::query_as("SELECT email, username FROM users WHERE id = $1")
            .bind(auth_user.user_id)
            .fetch_one(&state.db.pool)
            .await?;

    Ok(Json(ProfileResponse {
        user_id: profile.user_id,
        email,
        username,
        display_name: profile.display_name.clone(),
        verified: profile.verified,
        premium_plan: profile.premium_plan.clone(),
        subscription_expiry: profile.subscription_expiry,
        premium_active: profile.premium_active(),
    }))
}

/// Update the authenticated user's profile.
/// PUT /account/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate()?;

    let result = sqlx::query(
        "UPDATE profiles SET display_name = COALESCE($2, display_name), updated_at = NOW() \
         WHERE user_id = $1",
    )
    .bind(auth_user.user_id)
    .bind(&req.display_name)
    .execute(&state.db.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Profile not found"));
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Serialize)]
pub struct CardsResponse {
    pub cards: Vec<Card>,
    pub total: usize,
}

/// List the authenticated user's own cards, published or not.
/// GET /account/cards
pub async fn my_cards(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<CardsResponse>, AppError> {
    let cards: Vec<Card> = sqlx::query_as(
        r#"
        SELECT id, owner_id, name, profession, category, location, phone, email,
               website, whatsapp, instagram, linkedin, youtube, template, theme_color,
               like_count, view_count, published, created_at, updated_at
        FROM cards
        WHERE owner_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth_user.user_id)
    .fetch_all(&state.db.pool)
    .await?;

    let total = cards.len();
    Ok(Json(CardsResponse { cards, total }))
}

/// List the cards the authenticated user has saved.
/// GET /account/saved
pub async fn saved_cards(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<CardsResponse>, AppError> {
    let cards: Vec<Card> = sqlx::query_as(
        r#"
        SELECT c.id, c.owner_id, c.name, c.profession, c.category, c.location, c.phone,
               c.email, c.website, c.whatsapp, c.instagram, c.linkedin, c.youtube,
               c.template, c.theme_color, c.like_count, c.view_count, c.published,
               c.created_at, c.updated_at
        FROM card_saves s
        JOIN cards c ON c.id = s.card_id
        WHERE s.user_id = $1 AND c.published
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(auth_user.user_id)
    .fetch_all(&state.db.pool)
    .await?;

    let total = cards.len();
    Ok(Json(CardsResponse { cards, total }))
}

#[derive(Debug, Serialize)]
pub struct OffersResponse {
    pub offers: Vec<Offer>,
    pub total: usize,
}

/// List the authenticated user's offers, active or not.
/// GET /account/offers
pub async fn my_offers(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<OffersResponse>, AppError> {
    let offers: Vec<Offer> = sqlx::query_as(
        r#"
        SELECT id, owner_id, card_id, title, description, image_url, active, created_at
        FROM offers
        WHERE owner_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth_user.user_id)
    .fetch_all(&state.db.pool)
    .await?;

    let total = offers.len();
    Ok(Json(OffersResponse { offers, total }))
}
