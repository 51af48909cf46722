use crate::models::PriceTier;

/// Default preference radius for venue distance scoring (km)
pub const VENUE_RADIUS_KM: f64 = 3.0;

/// Default preference radius for person-to-person proximity (km)
pub const PROXIMITY_RADIUS_KM: f64 = 5.0;

/// Default score subtracted per tier of price difference
pub const PRICE_TIER_PENALTY: f64 = 50.0;

/// Default viewing duration that saturates the history signal (seconds)
pub const VIEW_CAP_SECS: u32 = 60;

/// Distance sub-score (0-100)
///
/// Linear decay from 100 at 0 km down to `floor` at and beyond
/// `radius_km`. Monotonically non-increasing in distance.
#[inline]
pub fn distance_score(distance_km: f64, radius_km: f64, floor: f64) -> f64 {
    if radius_km <= 0.0 || distance_km >= radius_km {
        return floor;
    }
    let score = (1.0 - distance_km / radius_km) * 100.0;
    score.max(floor).min(100.0)
}

/// Interest overlap sub-score (0-100) plus the matched tags
///
/// Intersection size normalized by the venue's tag count. Either side
/// being empty scores 0 rather than erroring. Matched tags come back
/// sorted so reason strings are deterministic.
pub fn interest_overlap_score(interests: &[String], tags: &[String]) -> (f64, Vec<String>) {
    if interests.is_empty() || tags.is_empty() {
        return (0.0, vec![]);
    }

    let mut matched: Vec<String> = tags
        .iter()
        .filter(|tag| interests.contains(tag))
        .cloned()
        .collect();
    matched.sort();
    matched.dedup();

    let score = (matched.len() as f64 / tags.len() as f64) * 100.0;
    (score.min(100.0), matched)
}

/// Price alignment sub-score (0-100)
///
/// Exact tier match is 100; each tier of difference subtracts a fixed
/// penalty, floored at 0.
#[inline]
pub fn price_alignment_score(a: PriceTier, b: PriceTier, per_tier_penalty: f64) -> f64 {
    let diff = (a.rank() as f64 - b.rank() as f64).abs();
    (100.0 - diff * per_tier_penalty).max(0.0)
}

/// Viewing history sub-score (0-100)
///
/// Saturates at `cap_secs`; no recorded view means no signal, not an error.
#[inline]
pub fn viewing_history_score(seconds: Option<u32>, cap_secs: u32) -> f64 {
    match seconds {
        Some(secs) if cap_secs > 0 => {
            (secs as f64 / cap_secs as f64).min(1.0) * 100.0
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_distance_score_decays_monotonically() {
        let near = distance_score(0.0, VENUE_RADIUS_KM, 0.0);
        let mid = distance_score(1.5, VENUE_RADIUS_KM, 0.0);
        let far = distance_score(3.0, VENUE_RADIUS_KM, 0.0);
        let very_far = distance_score(10.0, VENUE_RADIUS_KM, 0.0);

        assert_eq!(near, 100.0);
        assert!(near > mid && mid > far);
        assert_eq!(far, 0.0);
        assert_eq!(very_far, 0.0);
    }

    #[test]
    fn test_distance_score_respects_floor() {
        let score = distance_score(50.0, VENUE_RADIUS_KM, 10.0);
        assert_eq!(score, 10.0);
    }

    #[test]
    fn test_interest_overlap_full_match_is_max() {
        let interests = tags(&["coffee", "art", "indie"]);
        let venue_tags = tags(&["coffee", "art", "indie"]);

        let (score, matched) = interest_overlap_score(&interests, &venue_tags);
        assert_eq!(score, 100.0);
        assert_eq!(matched, tags(&["art", "coffee", "indie"]));
    }

    #[test]
    fn test_interest_overlap_disjoint_is_zero() {
        let interests = tags(&["coffee"]);
        let venue_tags = tags(&["techno", "dancing"]);

        let (score, matched) = interest_overlap_score(&interests, &venue_tags);
        assert_eq!(score, 0.0);
        assert!(matched.is_empty());
    }

    #[test]
    fn test_interest_overlap_empty_sets_are_zero_not_error() {
        assert_eq!(interest_overlap_score(&[], &tags(&["coffee"])).0, 0.0);
        assert_eq!(interest_overlap_score(&tags(&["coffee"]), &[]).0, 0.0);
    }

    #[test]
    fn test_price_alignment_exact_and_offsets() {
        assert_eq!(
            price_alignment_score(PriceTier::Moderate, PriceTier::Moderate, PRICE_TIER_PENALTY),
            100.0
        );
        assert_eq!(
            price_alignment_score(PriceTier::Budget, PriceTier::Moderate, PRICE_TIER_PENALTY),
            50.0
        );
        assert_eq!(
            price_alignment_score(PriceTier::Budget, PriceTier::Upscale, PRICE_TIER_PENALTY),
            0.0
        );
        assert_eq!(
            price_alignment_score(PriceTier::Budget, PriceTier::Luxury, PRICE_TIER_PENALTY),
            0.0
        );
    }

    #[test]
    fn test_viewing_history_saturates_at_cap() {
        assert_eq!(viewing_history_score(Some(30), VIEW_CAP_SECS), 50.0);
        assert_eq!(viewing_history_score(Some(60), VIEW_CAP_SECS), 100.0);
        assert_eq!(viewing_history_score(Some(600), VIEW_CAP_SECS), 100.0);
    }

    #[test]
    fn test_viewing_history_absent_is_zero() {
        assert_eq!(viewing_history_score(None, VIEW_CAP_SECS), 0.0);
    }

    #[test]
    fn test_all_subscores_bounded() {
        for d in [0.0, 0.5, 1.0, 2.9, 3.0, 100.0] {
            let s = distance_score(d, VENUE_RADIUS_KM, 0.0);
            assert!((0.0..=100.0).contains(&s));
        }
        for secs in [0, 1, 59, 60, 61, 10_000] {
            let s = viewing_history_score(Some(secs), VIEW_CAP_SECS);
            assert!((0.0..=100.0).contains(&s));
        }
    }
}
