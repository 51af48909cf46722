use crate::core::compatibility::CompatibilityScorer;
use crate::core::distance::haversine_distance;
use crate::core::signals::{
    distance_score, interest_overlap_score, price_alignment_score, viewing_history_score,
    PRICE_TIER_PENALTY, VENUE_RADIUS_KM, VIEW_CAP_SECS,
};
use crate::models::{ScoringWeights, User, Venue, VenueScoreResult};
use std::cmp::Ordering;

/// Tunable thresholds for venue ranking
#[derive(Debug, Clone, Copy)]
pub struct RankingThresholds {
    /// Preference radius for the distance signal (km)
    pub venue_radius_km: f64,
    /// Distance sub-score floor beyond the preference radius
    pub distance_floor: f64,
    /// Viewing duration that saturates the history signal (seconds)
    pub view_cap_secs: u32,
    /// Below this composite score for every venue, fall back to
    /// distance-only ordering
    pub min_relevance: f64,
    /// Venue-interest signal a user must show to count as "interested"
    pub interest_signal_threshold: f64,
    /// Minimum compatibility for the interested-people list
    pub compatibility_threshold: f64,
    /// Cap on interested people returned per venue
    pub max_interested_users: usize,
}

impl Default for RankingThresholds {
    fn default() -> Self {
        Self {
            venue_radius_km: VENUE_RADIUS_KM,
            distance_floor: 0.0,
            view_cap_secs: VIEW_CAP_SECS,
            min_relevance: 5.0,
            interest_signal_threshold: 0.3,
            compatibility_threshold: 40.0,
            max_interested_users: 5,
        }
    }
}

/// Multi-factor venue recommendation engine
///
/// Composite score (0-100 scale):
/// - Distance from user:  25% weight
/// - Interest matching:   35% weight
/// - Price tier fit:      15% weight
/// - Viewing history:     25% weight
///
/// Alongside each score the ranker emits human-readable reasons and the
/// compatible users who also show interest in the venue.
#[derive(Debug, Clone)]
pub struct VenueRanker {
    weights: ScoringWeights,
    thresholds: RankingThresholds,
    compatibility: CompatibilityScorer,
}

impl VenueRanker {
    pub fn new(
        weights: ScoringWeights,
        thresholds: RankingThresholds,
        compatibility: CompatibilityScorer,
    ) -> Self {
        Self {
            weights,
            thresholds,
            compatibility,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            ScoringWeights::default(),
            RankingThresholds::default(),
            CompatibilityScorer::default(),
        )
    }

    /// Rank all venues for a user, best first
    ///
    /// Ordering is fully deterministic: score descending, then distance
    /// ascending, then venue id. When no venue clears the relevance
    /// threshold the ranker degrades to distance-only ordering instead
    /// of returning nothing.
    pub fn rank_venues(
        &self,
        user: &User,
        venues: &[Venue],
        all_users: &[User],
        top_n: Option<usize>,
    ) -> Vec<VenueScoreResult> {
        let mut results: Vec<VenueScoreResult> = venues
            .iter()
            .map(|venue| self.score_venue(user, venue, all_users))
            .collect();

        let degraded = results
            .iter()
            .all(|r| r.score < self.thresholds.min_relevance);

        if degraded {
            tracing::debug!(
                "No venue above relevance threshold {} for user {}, ranking by distance",
                self.thresholds.min_relevance,
                user.id
            );
            results.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.venue.id.cmp(&b.venue.id))
            });
        } else {
            results.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| {
                        a.distance_km
                            .partial_cmp(&b.distance_km)
                            .unwrap_or(Ordering::Equal)
                    })
                    .then_with(|| a.venue.id.cmp(&b.venue.id))
            });
        }

        if let Some(n) = top_n {
            results.truncate(n);
        }
        results
    }

    /// Rank the most compatible people for a user, best first
    ///
    /// Excludes the requesting user. An empty result is a valid answer,
    /// not an error.
    pub fn rank_people(
        &self,
        user: &User,
        all_users: &[User],
        top_n: Option<usize>,
    ) -> Vec<crate::models::CompatibilityResult> {
        let mut results: Vec<crate::models::CompatibilityResult> = all_users
            .iter()
            .filter(|other| other.id != user.id)
            .map(|other| self.compatibility.score(user, other))
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        if let Some(n) = top_n {
            results.truncate(n);
        }
        results
    }

    /// Score a single (user, venue) pair, producing the composite score,
    /// reasons in signal evaluation order, and interested people
    fn score_venue(&self, user: &User, venue: &Venue, all_users: &[User]) -> VenueScoreResult {
        let t = &self.thresholds;
        let mut reasons = Vec::new();

        // Signal 1: distance
        let distance_km = haversine_distance(
            user.latitude,
            user.longitude,
            venue.latitude,
            venue.longitude,
        );
        let dist_score = distance_score(distance_km, t.venue_radius_km, t.distance_floor);
        if distance_km < 1.0 {
            reasons.push(format!("Only {:.1}km away", distance_km));
        }

        // Signal 2: interest overlap
        let (interest_score, matched_tags) =
            interest_overlap_score(&user.interests, &venue.tags);
        if !matched_tags.is_empty() {
            reasons.push(format!(
                "Matches your interests: {}",
                matched_tags.join(", ")
            ));
        }

        // Signal 3: price alignment
        let price_score =
            price_alignment_score(user.price_tier, venue.price_tier, PRICE_TIER_PENALTY);
        if user.price_tier == venue.price_tier {
            reasons.push(format!("Fits your {} budget", venue.price_tier.label()));
        }

        // Signal 4: viewing history
        let view_secs = user.viewing_history.get(&venue.id).copied();
        let history_score = viewing_history_score(view_secs, t.view_cap_secs);
        if let Some(secs) = view_secs.filter(|s| *s > 0) {
            reasons.push(format!("You spent {}s viewing this", secs));
        }

        let total = dist_score * self.weights.distance
            + interest_score * self.weights.interests
            + price_score * self.weights.price
            + history_score * self.weights.history;
        let score = (total.clamp(0.0, 100.0) * 100.0).round() / 100.0;

        let interested_users = self.interested_users(user, venue, all_users);
        if !interested_users.is_empty() {
            reasons.push(format!(
                "{} compatible friends interested",
                interested_users.len().min(3)
            ));
        }

        VenueScoreResult {
            venue: venue.clone(),
            score,
            distance_km: (distance_km * 100.0).round() / 100.0,
            reasons,
            interested_users,
        }
    }

    /// Other users showing a qualifying signal toward the venue, ranked
    /// by compatibility with the requesting user
    fn interested_users(
        &self,
        user: &User,
        venue: &Venue,
        all_users: &[User],
    ) -> Vec<crate::models::CompatibilityResult> {
        let t = &self.thresholds;
        let mut interested: Vec<crate::models::CompatibilityResult> = all_users
            .iter()
            .filter(|other| other.id != user.id)
            .filter(|other| self.venue_interest_signal(other, venue) > t.interest_signal_threshold)
            .map(|other| self.compatibility.score(user, other))
            .filter(|c| c.score > t.compatibility_threshold)
            .collect();

        interested.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        interested.truncate(t.max_interested_users);
        interested
    }

    /// Implicit interest a user shows toward a venue: normalized viewing
    /// time plus tag-overlap ratio
    fn venue_interest_signal(&self, other: &User, venue: &Venue) -> f64 {
        let view_part = other
            .viewing_history
            .get(&venue.id)
            .map(|secs| *secs as f64 / self.thresholds.view_cap_secs.max(1) as f64)
            .unwrap_or(0.0);

        let overlap_part = if venue.tags.is_empty() {
            0.0
        } else {
            let matched = venue
                .tags
                .iter()
                .filter(|tag| other.interests.contains(tag))
                .count();
            matched as f64 / venue.tags.len() as f64
        };

        view_part + overlap_part
    }
}

impl Default for VenueRanker {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NotificationChannel, PriceTier, VenueCategory};
    use std::collections::HashMap;

    fn user(id: &str, lat: f64, lon: f64, interests: &[&str], tier: PriceTier) -> User {
        User {
            id: id.to_string(),
            name: format!("User {}", id),
            latitude: lat,
            longitude: lon,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            price_tier: tier,
            viewing_history: HashMap::new(),
            preferred_channel: NotificationChannel::Email,
        }
    }

    fn venue(id: &str, lat: f64, lon: f64, tags: &[&str], tier: PriceTier) -> Venue {
        Venue {
            id: id.to_string(),
            name: format!("Venue {}", id),
            category: VenueCategory::Cafe,
            latitude: lat,
            longitude: lon,
            price_tier: tier,
            tags: tags.iter().map(|s| s.to_string()).collect(),
            description: String::new(),
        }
    }

    #[test]
    fn test_perfect_fit_scores_high_with_reasons() {
        // Within 0.1km, all interests in the venue's five tags, matching
        // tier, saturated viewing history
        let mut u = user(
            "u1",
            40.7580,
            -73.9855,
            &["coffee", "art", "indie"],
            PriceTier::Moderate,
        );
        u.viewing_history.insert("v1".to_string(), 60);

        let v = venue(
            "v1",
            40.7585,
            -73.9850,
            &["coffee", "art", "indie", "wifi", "quiet"],
            PriceTier::Moderate,
        );

        let ranker = VenueRanker::with_defaults();
        let results = ranker.rank_venues(&u, &[v], &[u.clone()], None);
        let top = &results[0];

        assert!(
            top.score >= 80.0 && top.score <= 90.0,
            "expected ~85, got {}",
            top.score
        );
        assert!(top.reasons.iter().any(|r| r.contains("away")));
        assert!(top.reasons.iter().any(|r| r.contains("Matches your interests")));
        assert!(top.reasons.iter().any(|r| r.contains("viewing")));
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let u = user("u1", 40.7580, -73.9855, &["coffee", "art"], PriceTier::Moderate);
        let venues = vec![
            venue("v1", 40.7585, -73.9850, &["coffee", "books"], PriceTier::Moderate),
            venue("v2", 40.7575, -73.9845, &["coffee", "study"], PriceTier::Budget),
            venue("v3", 40.7590, -73.9860, &["art", "indie"], PriceTier::Moderate),
        ];

        let ranker = VenueRanker::with_defaults();
        let first = ranker.rank_venues(&u, &venues, &[u.clone()], None);
        let second = ranker.rank_venues(&u, &venues, &[u.clone()], None);

        let first_ids: Vec<&str> = first.iter().map(|r| r.venue.id.as_str()).collect();
        let second_ids: Vec<&str> = second.iter().map(|r| r.venue.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);

        for i in 1..first.len() {
            assert!(first[i - 1].score >= first[i].score);
        }
    }

    #[test]
    fn test_degraded_mode_orders_by_distance() {
        // User with no interests, no history, far from everything, and a
        // price tier nothing matches: every score stays below threshold
        let u = user("u1", 40.7580, -73.9855, &[], PriceTier::Luxury);
        let venues = vec![
            venue("far", 41.5, -74.0, &["techno"], PriceTier::Budget),
            venue("near", 40.9, -74.0, &["techno"], PriceTier::Budget),
        ];

        let ranker = VenueRanker::with_defaults();
        let results = ranker.rank_venues(&u, &venues, &[u.clone()], None);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].venue.id, "near");
        assert_eq!(results[1].venue.id, "far");
    }

    #[test]
    fn test_top_n_truncates() {
        let u = user("u1", 40.7580, -73.9855, &["coffee"], PriceTier::Moderate);
        let venues: Vec<Venue> = (0..10)
            .map(|i| {
                venue(
                    &format!("v{}", i),
                    40.7580 + i as f64 * 0.001,
                    -73.9855,
                    &["coffee"],
                    PriceTier::Moderate,
                )
            })
            .collect();

        let ranker = VenueRanker::with_defaults();
        let results = ranker.rank_venues(&u, &venues, &[u.clone()], Some(3));
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_interested_users_listed_and_capped() {
        let mut u = user("u1", 40.7580, -73.9855, &["coffee", "art"], PriceTier::Moderate);
        u.viewing_history.insert("v1".to_string(), 45);

        // Nearby users with overlapping interests who viewed the venue
        let mut others: Vec<User> = (2..=8)
            .map(|i| {
                let mut o = user(
                    &format!("u{}", i),
                    40.7581,
                    -73.9856,
                    &["coffee", "art"],
                    PriceTier::Moderate,
                );
                o.viewing_history.insert("v1".to_string(), 50);
                o
            })
            .collect();
        others.push(u.clone());

        let v = venue("v1", 40.7585, -73.9850, &["coffee", "art"], PriceTier::Moderate);

        let ranker = VenueRanker::with_defaults();
        let results = ranker.rank_venues(&u, &[v], &others, None);
        let top = &results[0];

        assert!(!top.interested_users.is_empty());
        assert!(top.interested_users.len() <= 5);
        assert!(top
            .reasons
            .iter()
            .any(|r| r.contains("compatible friends interested")));
        // Requesting user never appears in their own list
        assert!(top.interested_users.iter().all(|c| c.user_id != "u1"));
    }

    #[test]
    fn test_no_compatible_people_is_empty_not_error() {
        let u = user("u1", 40.7580, -73.9855, &["coffee"], PriceTier::Budget);
        let loner = user("u2", 45.0, -80.0, &["techno"], PriceTier::Luxury);

        let ranker = VenueRanker::with_defaults();
        let people = ranker.rank_people(&u, &[u.clone(), loner], None);

        assert_eq!(people.len(), 1);
        assert_eq!(people[0].score, 0.0);

        // And with only the requesting user present, the list is empty
        let people = ranker.rank_people(&u, &[u.clone()], None);
        assert!(people.is_empty());
    }

    #[test]
    fn test_composite_scores_bounded() {
        let mut u = user("u1", 40.7580, -73.9855, &["coffee", "art"], PriceTier::Moderate);
        u.viewing_history.insert("v1".to_string(), 10_000);

        let venues = vec![
            venue("v1", 40.7580, -73.9855, &["coffee", "art"], PriceTier::Moderate),
            venue("v2", 50.0, -80.0, &[], PriceTier::Luxury),
        ];

        let ranker = VenueRanker::with_defaults();
        for r in ranker.rank_venues(&u, &venues, &[u.clone()], None) {
            assert!((0.0..=100.0).contains(&r.score), "score {}", r.score);
        }
    }
}
