//! Admin console handlers. All routes here sit behind both the auth
//! middleware and the admin role check.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Ad, Card, CreateAdRequest, UpdateAdRequest, UserRole};
use crate::utils::response::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub verified: bool,
    pub premium_plan: Option<String>,
    pub subscription_expiry: Option<DateTime<Utc>>,
    pub card_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AdminUsersResponse {
    pub users: Vec<AdminUser>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List users with profile and card counts.
/// GET /admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<AdminUsersResponse>, AppError> {
    let limit = page.limit.unwrap_or(50).clamp(1, 200);
    let offset = page.offset.unwrap_or(0).max(0);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db.pool)
        .await?;

    type Row = (
        Uuid,
        String,
        String,
        UserRole,
        bool,
        Option<String>,
        Option<DateTime<Utc>>,
        i64,
        DateTime<Utc>,
    );

    let rows: Vec<Row> = sqlx::query_as(
        r#"
        SELECT u.id, u.email, u.username, u.role,
               p.verified, p.premium_plan, p.subscription_expiry,
               (SELECT COUNT(*) FROM cards c WHERE c.owner_id = u.id),
               u.created_at
        FROM users u
        JOIN profiles p ON p.user_id = u.id
        ORDER BY u.created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db.pool)
    .await?;

    let users = rows
        .into_iter()
        .map(
            |(id, email, username, role, verified, premium_plan, subscription_expiry, card_count, created_at)| {
                AdminUser {
                    id,
                    email,
                    username,
                    role,
                    verified,
                    premium_plan,
                    subscription_expiry,
                    card_count,
                    created_at,
                }
            },
        )
        .collect();

    Ok(Json(AdminUsersResponse { users, total }))
}

/// Delete a user; cards, offers, and interactions cascade.
/// DELETE /admin/users/:id
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'user'")
        .bind(user_id)
        .execute(&state.db.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!("Admin deleted user {}", user_id);
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Mark a user's profile as verified.
/// POST /admin/users/:id/verify
pub async fn verify_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result =
        sqlx::query("UPDATE profiles SET verified = TRUE, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(&state.db.pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!("Admin verified user {}", user_id);
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct GrantPremiumRequest {
    #[validate(length(min = 1, max = 32))]
    pub plan: String,
    pub expires_at: DateTime<Utc>,
}

/// Grant a time-boxed premium plan.
/// POST /admin/users/:id/premium
pub async fn grant_premium(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<GrantPremiumRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate()?;

    if req.expires_at <= Utc::now() {
        return Err(AppError::bad_request("Expiry must be in the future"));
    }

    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET premium_plan = $2, subscription_expiry = $3, updated_at = NOW()
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(&req.plan)
    .bind(req.expires_at)
    .execute(&state.db.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!(
        "Admin granted {} plan to user {} until {}",
        req.plan,
        user_id,
        req.expires_at
    );
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Serialize)]
pub struct AdminCardsResponse {
    pub cards: Vec<Card>,
    pub total: i64,
}

/// List all cards, published or not.
/// GET /admin/cards
pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<AdminCardsResponse>, AppError> {
    let limit = page.limit.unwrap_or(50).clamp(1, 200);
    let offset = page.offset.unwrap_or(0).max(0);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cards")
        .fetch_one(&state.db.pool)
        .await?;

    let cards: Vec<Card> = sqlx::query_as(
        r#"
        SELECT id, owner_id, name, profession, category, location, phone, email,
               website, whatsapp, instagram, linkedin, youtube, template, theme_color,
               like_count, view_count, published, created_at, updated_at
        FROM cards
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(AdminCardsResponse { cards, total }))
}

/// Delete any card.
/// DELETE /admin/cards/:id
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM cards WHERE id = $1")
        .bind(card_id)
        .execute(&state.db.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Card not found"));
    }

    tracing::info!("Admin deleted card {}", card_id);
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Serialize)]
pub struct AdsResponse {
    pub ads: Vec<Ad>,
    pub total: usize,
}

const AD_COLUMNS: &str =
    "id, title, image_url, link_url, important, repeat_interval, active, created_at";

/// List all ads, active or not.
/// GET /admin/ads
pub async fn list_ads(State(state): State<Arc<AppState>>) -> Result<Json<AdsResponse>, AppError> {
    let ads: Vec<Ad> = sqlx::query_as(&format!(
        "SELECT {} FROM ads ORDER BY created_at DESC",
        AD_COLUMNS
    ))
    .fetch_all(&state.db.pool)
    .await?;

    let total = ads.len();
    Ok(Json(AdsResponse { ads, total }))
}

/// Create an ad unit.
/// POST /admin/ads
pub async fn create_ad(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAdRequest>,
) -> Result<Json<Ad>, AppError> {
    req.validate()?;

    if req.important && req.repeat_interval.is_none() {
        return Err(AppError::bad_request(
            "Important ads require a repeat_interval",
        ));
    }

    let ad: Ad = sqlx::query_as(&format!(
        r#"
        INSERT INTO ads (title, image_url, link_url, important, repeat_interval)
        VALUES ($1, $2, $3, $4, COALESCE($5, 1))
        RETURNING {}
        "#,
        AD_COLUMNS
    ))
    .bind(&req.title)
    .bind(&req.image_url)
    .bind(&req.link_url)
    .bind(req.important)
    .bind(req.repeat_interval)
    .fetch_one(&state.db.pool)
    .await?;

    tracing::info!("Admin created ad {} ({})", ad.id, ad.title);
    Ok(Json(ad))
}

/// Update an ad unit.
/// PUT /admin/ads/:id
pub async fn update_ad(
    State(state): State<Arc<AppState>>,
    Path(ad_id): Path<Uuid>,
    Json(req): Json<UpdateAdRequest>,
) -> Result<Json<Ad>, AppError> {
    req.validate()?;

    let ad: Option<Ad> = sqlx::query_as(&format!(
        r#"
        UPDATE ads SET
            title = COALESCE($2, title),
            image_url = COALESCE($3, image_url),
            link_url = COALESCE($4, link_url),
            important = COALESCE($5, important),
            repeat_interval = COALESCE($6, repeat_interval),
            active = COALESCE($7, active)
        WHERE id = $1
        RETURNING {}
        "#,
        AD_COLUMNS
    ))
    .bind(ad_id)
    .bind(&req.title)
    .bind(&req.image_url)
    .bind(&req.link_url)
    .bind(req.important)
    .bind(req.repeat_interval)
    .bind(req.active)
    .fetch_optional(&state.db.pool)
    .await?;

    ad.map(Json).ok_or_else(|| AppError::not_found("Ad not found"))
}

/// Delete an ad unit.
/// DELETE /admin/ads/:id
pub async fn delete_ad(
    State(state): State<Arc<AppState>>,
    Path(ad_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM ads WHERE id = $1")
        .bind(ad_id)
        .execute(&state.db.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Ad not found"));
    }

    tracing::info!("Admin deleted ad {}", ad_id);
    Ok(Json(serde_json::json!({ "ok": true })))
}
