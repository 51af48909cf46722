use crate::core::distance::haversine_distance;
use crate::core::signals::{
    distance_score, price_alignment_score, PRICE_TIER_PENALTY, PROXIMITY_RADIUS_KM,
};
use crate::models::{CompatibilityResult, CompatibilityWeights, User};

/// Person-to-person compatibility scoring
///
/// Scoring formula (0-100 scale):
/// - Shared interests (Jaccard): 40% weight
/// - Geographic proximity:       30% weight
/// - Price tier alignment:       30% weight
///
/// The score is symmetric: score(a, b) == score(b, a).
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityScorer {
    weights: CompatibilityWeights,
    proximity_radius_km: f64,
    price_tier_penalty: f64,
}

impl CompatibilityScorer {
    pub fn new(weights: CompatibilityWeights) -> Self {
        Self {
            weights,
            proximity_radius_km: PROXIMITY_RADIUS_KM,
            price_tier_penalty: PRICE_TIER_PENALTY,
        }
    }

    pub fn score(&self, user: &User, other: &User) -> CompatibilityResult {
        let (interest_score, shared_interests) =
            jaccard_interest_score(&user.interests, &other.interests);

        let distance_km = haversine_distance(
            user.latitude,
            user.longitude,
            other.latitude,
            other.longitude,
        );
        let proximity = distance_score(distance_km, self.proximity_radius_km, 0.0);

        let price = price_alignment_score(
            user.price_tier,
            other.price_tier,
            self.price_tier_penalty,
        );

        let total = interest_score * self.weights.shared_interests
            + proximity * self.weights.proximity
            + price * self.weights.price;

        CompatibilityResult {
            user_id: other.id.clone(),
            user_name: other.name.clone(),
            score: (total * 100.0).round() / 100.0,
            shared_interests,
            distance_km: (distance_km * 100.0).round() / 100.0,
        }
    }
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self::new(CompatibilityWeights::default())
    }
}

/// Jaccard similarity of two interest sets, scaled to 0-100, plus the
/// sorted intersection. Empty union scores 0.
fn jaccard_interest_score(a: &[String], b: &[String]) -> (f64, Vec<String>) {
    if a.is_empty() && b.is_empty() {
        return (0.0, vec![]);
    }

    let mut shared: Vec<String> = a.iter().filter(|i| b.contains(i)).cloned().collect();
    shared.sort();
    shared.dedup();

    let mut union: Vec<&String> = a.iter().chain(b.iter()).collect();
    union.sort();
    union.dedup();

    let score = (shared.len() as f64 / union.len() as f64) * 100.0;
    (score, shared)
}
