//! Feed query construction.
//!
//! Translates the visitor-facing filter state into a single SQL
//! statement. Only `newest` and `views` are pushed down as `ORDER BY`;
//! `likes` and `rating` depend on joined aggregates and are re-sorted
//! in process after the fetch.

use sqlx::{Postgres, QueryBuilder};

use crate::models::FeedCard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSort {
    #[default]
    Newest,
    Views,
    Likes,
    Rating,
}

impl FeedSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "newest" => Some(FeedSort::Newest),
            "views" => Some(FeedSort::Views),
            "likes" => Some(FeedSort::Likes),
            "rating" => Some(FeedSort::Rating),
            _ => None,
        }
    }

    /// Whether the ordering can be expressed as a SQL `ORDER BY`.
    pub fn pushdown(&self) -> Option<&'static str> {
        match self {
            FeedSort::Newest => Some("c.created_at DESC"),
            FeedSort::Views => Some("c.view_count DESC"),
            FeedSort::Likes | FeedSort::Rating => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
    pub search: String,
    pub occupation: Vec<String>,
    pub category: Option<String>,
    pub area: String,
    pub state: Vec<String>,
    pub country: Vec<String>,
    pub sort: FeedSort,
}

const BASE_SQL: &str = r#"
SELECT
    c.id, c.name, c.profession, c.category, c.location,
    c.template, c.theme_color, c.like_count, c.view_count,
    COALESCE(r.avg_rating, 0)::float8 AS avg_rating,
    COALESCE(r.rating_count, 0) AS rating_count,
    c.created_at
FROM cards c
LEFT JOIN (
    SELECT card_id, AVG(rating) AS avg_rating, COUNT(*) AS rating_count
    FROM card_ratings
    GROUP BY card_id
) r ON r.card_id = c.id
WHERE c.published"#;

fn contains_pattern(value: &str) -> String {
    format!("%{}%", value.trim())
}

/// Build the feed statement for a filter. Empty-string and empty-vec
/// filters add no clause.
pub fn build_query(filter: &FeedFilter, limit: i64, offset: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(BASE_SQL);

    if !filter.search.trim().is_empty() {
        let pattern = contains_pattern(&filter.search);
        qb.push(" AND (c.name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR c.profession ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR c.location ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if !filter.occupation.is_empty() {
        qb.push(" AND (");
        for (i, occupation) in filter.occupation.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push("c.profession ILIKE ");
            qb.push_bind(contains_pattern(occupation));
        }
        qb.push(")");
    }

    if let Some(category) = &filter.category {
        if !category.is_empty() && category != "All" {
            qb.push(" AND c.category = ");
            qb.push_bind(category.clone());
        }
    }

    if !filter.area.trim().is_empty() {
        qb.push(" AND c.location ILIKE ");
        qb.push_bind(contains_pattern(&filter.area));
    }

    for values in [&filter.state, &filter.country] {
        if values.is_empty() {
            continue;
        }
        qb.push(" AND (");
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push("c.location ILIKE ");
            qb.push_bind(contains_pattern(value));
        }
        qb.push(")");
    }

    // Likes/rating keep a stable newest-first base order; the real
    // ordering happens in `sort_in_process` after the fetch.
    let order_by = filter.sort.pushdown().unwrap_or("c.created_at DESC");
    qb.push(" ORDER BY ");
    qb.push(order_by);

    qb.push(" LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);

    qb
}

/// Apply the aggregate-dependent sorts the database did not.
pub fn sort_in_process(cards: &mut [FeedCard], sort: FeedSort) {
    match sort {
        FeedSort::Likes => cards.sort_by(|a, b| b.like_count.cmp(&a.like_count)),
        FeedSort::Rating => {
            cards.sort_by(|a, b| {
                b.avg_rating
                    .partial_cmp(&a.avg_rating)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.rating_count.cmp(&a.rating_count))
            });
        }
        FeedSort::Newest | FeedSort::Views => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn feed_card(likes: i64, rating: f64, rating_count: i64) -> FeedCard {
        FeedCard {
            id: Uuid::new_v4(),
            name: "Card".to_string(),
            profession: "Dev".to_string(),
            category: "All".to_string(),
            location: "Mumbai".to_string(),
            template: "classic".to_string(),
            theme_color: "#1a1a2e".to_string(),
            like_count: likes,
            view_count: 0,
            avg_rating: rating,
            rating_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_filters_add_no_clauses() {
        let filter = FeedFilter {
            search: String::new(),
            occupation: vec![],
            category: Some("All".to_string()),
            area: String::new(),
            state: vec![],
            country: vec![],
            sort: FeedSort::Newest,
        };

        let sql = build_query(&filter, 50, 0).into_sql();
        assert!(!sql.contains("ILIKE"));
        assert!(!sql.contains("c.category ="));
        assert!(sql.contains("ORDER BY c.created_at DESC"));
    }

    #[test]
    fn test_filters_compile_to_conjunction() {
        let filter = FeedFilter {
            search: "anil".to_string(),
            occupation: vec!["Doctor".to_string(), "Dentist".to_string()],
            category: Some("Health".to_string()),
            area: "Andheri".to_string(),
            state: vec!["Maharashtra".to_string()],
            country: vec![],
            sort: FeedSort::Views,
        };

        let sql = build_query(&filter, 50, 0).into_sql();
        assert!(sql.contains("c.name ILIKE"));
        assert!(sql.contains("c.profession ILIKE"));
        assert!(sql.contains("c.category ="));
        assert!(sql.contains("c.location ILIKE"));
        assert!(sql.contains("ORDER BY c.view_count DESC"));
    }

    #[test]
    fn test_aggregate_sorts_stay_out_of_sql() {
        let filter = FeedFilter {
            sort: FeedSort::Likes,
            ..Default::default()
        };
        let sql = build_query(&filter, 50, 0).into_sql();
        // Stable base order only; likes are sorted in process.
        assert!(sql.contains("ORDER BY c.created_at DESC"));
        assert!(!sql.contains("like_count DESC"));
    }

    #[test]
    fn test_sort_in_process_by_likes_and_rating() {
        let mut cards = vec![
            feed_card(1, 2.0, 4),
            feed_card(9, 5.0, 1),
            feed_card(4, 4.5, 10),
        ];

        sort_in_process(&mut cards, FeedSort::Likes);
        let likes: Vec<i64> = cards.iter().map(|c| c.like_count).collect();
        assert_eq!(likes, vec![9, 4, 1]);

        sort_in_process(&mut cards, FeedSort::Rating);
        let ratings: Vec<f64> = cards.iter().map(|c| c.avg_rating).collect();
        assert_eq!(ratings, vec![5.0, 4.5, 2.0]);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(FeedSort::parse("newest"), Some(FeedSort::Newest));
        assert_eq!(FeedSort::parse("VIEWS"), Some(FeedSort::Views));
        assert_eq!(FeedSort::parse("rating"), Some(FeedSort::Rating));
        assert_eq!(FeedSort::parse("bogus"), None);
    }
}
