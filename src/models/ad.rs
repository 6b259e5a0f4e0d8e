use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Admin-managed sponsored unit. Important ads carry a forced injection
/// cadence (`repeat_interval`); regular ads rotate round-robin.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ad {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub important: bool,
    pub repeat_interval: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdRequest {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(url)]
    pub image_url: String,
    #[validate(url)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub important: bool,
    #[validate(range(min = 1))]
    pub repeat_interval: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAdRequest {
    #[validate(length(min = 1, max = 120))]
    pub title: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(url)]
    pub link_url: Option<String>,
    pub important: Option<bool>,
    #[validate(range(min = 1))]
    pub repeat_interval: Option<i32>,
    pub active: Option<bool>,
}
