use serde::{Deserialize, Serialize};
use validator::Validate;

/// Result of a like/save toggle: the state after the flip.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub active: bool,
    pub like_count: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RateCardRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
}

#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub avg_rating: f64,
    pub rating_count: i64,
}
