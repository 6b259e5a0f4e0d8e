use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub profession: String,
    pub category: String,
    pub location: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub youtube: Option<String>,
    pub template: String,
    pub theme_color: String,
    pub like_count: i64,
    pub view_count: i64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[validate(length(min = 1, max = 80))]
    pub profession: String,
    #[validate(length(min = 1, max = 40))]
    pub category: String,
    #[validate(length(max = 120))]
    pub location: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub whatsapp: Option<String>,
    #[validate(url)]
    pub instagram: Option<String>,
    #[validate(url)]
    pub linkedin: Option<String>,
    #[validate(url)]
    pub youtube: Option<String>,
    pub template: String,
    pub theme_color: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCardRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub profession: Option<String>,
    #[validate(length(min = 1, max = 40))]
    pub category: Option<String>,
    #[validate(length(max = 120))]
    pub location: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub whatsapp: Option<String>,
    #[validate(url)]
    pub instagram: Option<String>,
    #[validate(url)]
    pub linkedin: Option<String>,
    #[validate(url)]
    pub youtube: Option<String>,
    pub template: Option<String>,
    pub theme_color: Option<String>,
    pub published: Option<bool>,
}

/// Card as it appears in the visitor-facing feed, carrying the
/// aggregate columns the `likes`/`rating` sorts depend on.
#[derive(Debug, Clone, Serialize)]
pub struct FeedCard {
    pub id: Uuid,
    pub name: String,
    pub profession: String,
    pub category: String,
    pub location: String,
    pub template: String,
    pub theme_color: String,
    pub like_count: i64,
    pub view_count: i64,
    pub avg_rating: f64,
    pub rating_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CardResponse {
    #[serde(flatten)]
    pub card: Card,
    pub avg_rating: f64,
    pub rating_count: i64,
    /// Present only for authenticated viewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_rating: Option<i32>,
}
