//! Feed ad interleaving.
//!
//! Mixes sponsored units into an ordered card list: after every
//! `interval`-th card an ad slot opens. Important ads win a slot when
//! their `repeat_interval` divides the slot counter; otherwise regular
//! ads rotate round-robin; otherwise the slot stays empty.

use serde::Serialize;

use crate::models::{Ad, FeedCard};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedItem {
    Card(FeedCard),
    Ad(Ad),
}

/// Pure transform over the two input lists. Deterministic and
/// idempotent: the same inputs always yield the same mixed list, and
/// injected ads sit exactly after indices `interval`, `2*interval`, ...
/// of the pre-injection card numbering.
pub fn interleave(cards: Vec<FeedCard>, ads: &[Ad], interval: usize) -> Vec<FeedItem> {
    if interval == 0 || ads.is_empty() {
        return cards.into_iter().map(FeedItem::Card).collect();
    }

    let important: Vec<&Ad> = ads.iter().filter(|a| a.important).collect();
    let regular: Vec<&Ad> = ads.iter().filter(|a| !a.important).collect();

    let mut items = Vec::with_capacity(cards.len() + cards.len() / interval);
    let mut slot: u64 = 0;
    let mut rotation = 0usize;

    for (idx, card) in cards.into_iter().enumerate() {
        items.push(FeedItem::Card(card));

        if (idx + 1) % interval != 0 {
            continue;
        }
        slot += 1;

        // First matching important ad wins the slot.
        let forced = important
            .iter()
            .find(|a| a.repeat_interval > 0 && slot % a.repeat_interval as u64 == 0);

        if let Some(ad) = forced {
            items.push(FeedItem::Ad((*ad).clone()));
        } else if !regular.is_empty() {
            items.push(FeedItem::Ad(regular[rotation % regular.len()].clone()));
            rotation += 1;
        }
        // No regular ads and no important match: the slot injects nothing.
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn card(n: usize) -> FeedCard {
        FeedCard {
            id: Uuid::new_v4(),
            name: format!("Card {}", n),
            profession: "Tester".to_string(),
            category: "All".to_string(),
            location: "Pune".to_string(),
            template: "classic".to_string(),
            theme_color: "#1a1a2e".to_string(),
            like_count: 0,
            view_count: 0,
            avg_rating: 0.0,
            rating_count: 0,
            created_at: Utc::now(),
        }
    }

    fn ad(title: &str, important: bool, repeat_interval: i32) -> Ad {
        Ad {
            id: Uuid::new_v4(),
            title: title.to_string(),
            image_url: "https://ads.example.com/a.png".to_string(),
            link_url: None,
            important,
            repeat_interval,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn ad_titles(items: &[FeedItem]) -> Vec<String> {
        items
            .iter()
            .filter_map(|item| match item {
                FeedItem::Ad(a) => Some(a.title.clone()),
                FeedItem::Card(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_ads_injected_after_every_interval() {
        let cards: Vec<FeedCard> = (0..47).map(card).collect();
        let ads = vec![ad("A", false, 1), ad("B", false, 1)];

        let items = interleave(cards, &ads, 15);

        // floor(47 / 15) = 3 slots, all filled by regular ads
        assert_eq!(ad_titles(&items), vec!["A", "B", "A"]);
        assert_eq!(items.len(), 50);

        // Ads sit exactly after the 15th, 30th, 45th card of the
        // pre-injection numbering.
        let ad_positions: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| matches!(item, FeedItem::Ad(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(ad_positions, vec![15, 31, 47]);
    }

    #[test]
    fn test_important_ad_wins_matching_slots() {
        // 9 slots worth of cards; important ad fires at slots 3, 6, 9,
        // regular ads fill 1, 2, 4, 5, 7, 8 round-robin.
        let cards: Vec<FeedCard> = (0..135).map(card).collect();
        let ads = vec![ad("VIP", true, 3), ad("R1", false, 1), ad("R2", false, 1)];

        let items = interleave(cards, &ads, 15);

        assert_eq!(
            ad_titles(&items),
            vec!["R1", "R2", "VIP", "R1", "R2", "VIP", "R1", "R2", "VIP"]
        );
    }

    #[test]
    fn test_unmatched_slots_stay_empty_without_regular_ads() {
        // Only an important ad with interval 2: slots 1 and 3 inject
        // nothing, slot 2 injects the ad.
        let cards: Vec<FeedCard> = (0..45).map(card).collect();
        let ads = vec![ad("VIP", true, 2)];

        let items = interleave(cards, &ads, 15);

        assert_eq!(ad_titles(&items), vec!["VIP"]);
        assert_eq!(items.len(), 46);
    }

    #[test]
    fn test_short_list_injects_nothing() {
        let cards: Vec<FeedCard> = (0..14).map(card).collect();
        let ads = vec![ad("A", false, 1)];

        let items = interleave(cards, &ads, 15);
        assert!(ad_titles(&items).is_empty());
        assert_eq!(items.len(), 14);
    }

    #[test]
    fn test_no_ads_is_identity() {
        let cards: Vec<FeedCard> = (0..30).map(card).collect();
        let items = interleave(cards, &[], 15);
        assert_eq!(items.len(), 30);
        assert!(items.iter().all(|i| matches!(i, FeedItem::Card(_))));
    }
}
