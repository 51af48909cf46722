use crate::models::{NotificationChannel, PriceTier, User, Venue, VenueCategory};
use std::collections::HashMap;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn history(entries: &[(&str, u32)]) -> HashMap<String, u32> {
    entries
        .iter()
        .map(|(id, secs)| (id.to_string(), *secs))
        .collect()
}

/// Demo dataset: five Midtown Manhattan users and six venues
///
/// Loaded into the in-memory directory at startup; the rest of the system
/// only sees the `Directory` trait.
pub fn demo_dataset() -> (Vec<User>, Vec<Venue>) {
    let users = vec![
        User {
            id: "user1".to_string(),
            name: "Alex Chen".to_string(),
            latitude: 40.7580,
            longitude: -73.9855,
            interests: strings(&["coffee", "art", "music", "indie"]),
            price_tier: PriceTier::Moderate,
            viewing_history: history(&[("venue1", 45), ("venue3", 30), ("venue5", 60)]),
            preferred_channel: NotificationChannel::Email,
        },
        User {
            id: "user2".to_string(),
            name: "Sam Rivera".to_string(),
            latitude: 40.7589,
            longitude: -73.9851,
            interests: strings(&["coffee", "books", "quiet", "study"]),
            price_tier: PriceTier::Budget,
            viewing_history: history(&[("venue1", 120), ("venue2", 90)]),
            preferred_channel: NotificationChannel::Push,
        },
        User {
            id: "user3".to_string(),
            name: "Jordan Kim".to_string(),
            latitude: 40.7520,
            longitude: -73.9900,
            interests: strings(&["music", "cocktails", "nightlife", "dancing"]),
            price_tier: PriceTier::Upscale,
            viewing_history: history(&[("venue4", 80), ("venue6", 55)]),
            preferred_channel: NotificationChannel::Sms,
        },
        User {
            id: "user4".to_string(),
            name: "Taylor Park".to_string(),
            latitude: 40.7595,
            longitude: -73.9840,
            interests: strings(&["art", "coffee", "photography", "indie"]),
            price_tier: PriceTier::Moderate,
            viewing_history: history(&[("venue1", 35), ("venue5", 90)]),
            preferred_channel: NotificationChannel::Email,
        },
        User {
            id: "user5".to_string(),
            name: "Morgan Lee".to_string(),
            latitude: 40.7560,
            longitude: -73.9870,
            interests: strings(&["food", "wine", "culture", "art"]),
            price_tier: PriceTier::Upscale,
            viewing_history: history(&[("venue3", 65), ("venue5", 40)]),
            preferred_channel: NotificationChannel::Push,
        },
    ];

    let venues = vec![
        Venue {
            id: "venue1".to_string(),
            name: "Brew & Pages Cafe".to_string(),
            category: VenueCategory::Cafe,
            latitude: 40.7585,
            longitude: -73.9850,
            price_tier: PriceTier::Moderate,
            tags: strings(&["coffee", "books", "wifi", "quiet", "art"]),
            description: "Cozy cafe with art gallery and book exchange".to_string(),
        },
        Venue {
            id: "venue2".to_string(),
            name: "Study Spot Coffee".to_string(),
            category: VenueCategory::Cafe,
            latitude: 40.7575,
            longitude: -73.9845,
            price_tier: PriceTier::Budget,
            tags: strings(&["coffee", "study", "wifi", "quiet"]),
            description: "Student-friendly cafe with long hours".to_string(),
        },
        Venue {
            id: "venue3".to_string(),
            name: "The Velvet Room".to_string(),
            category: VenueCategory::Bar,
            latitude: 40.7530,
            longitude: -73.9910,
            price_tier: PriceTier::Upscale,
            tags: strings(&["cocktails", "music", "nightlife", "lounge"]),
            description: "Upscale cocktail lounge with live jazz".to_string(),
        },
        Venue {
            id: "venue4".to_string(),
            name: "Electric Pulse".to_string(),
            category: VenueCategory::Club,
            latitude: 40.7510,
            longitude: -73.9920,
            price_tier: PriceTier::Upscale,
            tags: strings(&["dancing", "nightlife", "music", "DJ"]),
            description: "High-energy nightclub with top DJs".to_string(),
        },
        Venue {
            id: "venue5".to_string(),
            name: "Indie Corner Gallery".to_string(),
            category: VenueCategory::Gallery,
            latitude: 40.7590,
            longitude: -73.9860,
            price_tier: PriceTier::Moderate,
            tags: strings(&["art", "indie", "photography", "events"]),
            description: "Independent art gallery with monthly exhibitions".to_string(),
        },
        Venue {
            id: "venue6".to_string(),
            name: "Midnight Groove".to_string(),
            category: VenueCategory::Club,
            latitude: 40.7515,
            longitude: -73.9905,
            price_tier: PriceTier::Upscale,
            tags: strings(&["dancing", "music", "nightlife", "cocktails"]),
            description: "Trendy club with mixed music and VIP sections".to_string(),
        },
    ];

    (users, venues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_shape() {
        let (users, venues) = demo_dataset();
        assert_eq!(users.len(), 5);
        assert_eq!(venues.len(), 6);
    }

    #[test]
    fn test_viewing_history_points_at_real_venues() {
        let (users, venues) = demo_dataset();
        let venue_ids: Vec<&String> = venues.iter().map(|v| &v.id).collect();

        for user in &users {
            for venue_id in user.viewing_history.keys() {
                assert!(venue_ids.contains(&venue_id), "dangling id {}", venue_id);
            }
        }
    }
}
