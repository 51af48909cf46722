use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Price tier a user prefers or a venue charges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Budget,
    Moderate,
    Upscale,
    Luxury,
}

impl PriceTier {
    /// Ordinal position used for tier-difference scoring
    pub fn rank(self) -> u8 {
        match self {
            PriceTier::Budget => 1,
            PriceTier::Moderate => 2,
            PriceTier::Upscale => 3,
            PriceTier::Luxury => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceTier::Budget => "budget",
            PriceTier::Moderate => "moderate",
            PriceTier::Upscale => "upscale",
            PriceTier::Luxury => "luxury",
        }
    }
}

/// Venue category, also drives reservation-provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VenueCategory {
    Cafe,
    Restaurant,
    Bar,
    Club,
    Gallery,
    EventSpace,
}

/// Notification channel a user prefers for booking updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Sms,
    Push,
}

/// User profile with location, interests, and implicit viewing signals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(rename = "priceTier")]
    pub price_tier: PriceTier,
    /// venue id -> seconds spent viewing the venue page
    #[serde(rename = "viewingHistory", default)]
    pub viewing_history: HashMap<String, u32>,
    #[serde(rename = "preferredChannel", default = "default_channel")]
    pub preferred_channel: NotificationChannel,
}

fn default_channel() -> NotificationChannel {
    NotificationChannel::Email
}

/// Venue with location, tags, and pricing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub category: VenueCategory,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "priceTier")]
    pub price_tier: PriceTier,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Person-to-person compatibility result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityResult {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub score: f64,
    #[serde(rename = "sharedInterests")]
    pub shared_interests: Vec<String>,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

/// Scored venue recommendation with human-readable reasons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueScoreResult {
    pub venue: Venue,
    pub score: f64,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    pub reasons: Vec<String>,
    #[serde(rename = "interestedUsers")]
    pub interested_users: Vec<CompatibilityResult>,
}

/// Booking lifecycle status
///
/// Advances strictly forward through the happy path, or terminates in
/// `Failed` from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Created,
    Validated,
    ReservationPending,
    ReservationConfirmed,
    PaymentPending,
    PaymentConfirmed,
    NotificationsSent,
    Failed,
}

impl BookingStatus {
    fn order(self) -> u8 {
        match self {
            BookingStatus::Created => 0,
            BookingStatus::Validated => 1,
            BookingStatus::ReservationPending => 2,
            BookingStatus::ReservationConfirmed => 3,
            BookingStatus::PaymentPending => 4,
            BookingStatus::PaymentConfirmed => 5,
            BookingStatus::NotificationsSent => 6,
            BookingStatus::Failed => 7,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::NotificationsSent | BookingStatus::Failed
        )
    }

    /// Whether `next` is a legal forward transition from `self`
    pub fn can_advance_to(self, next: BookingStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == BookingStatus::Failed {
            return true;
        }
        next.order() == self.order() + 1
    }
}

/// A booking record created by the booking agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "confirmationCode")]
    pub confirmation_code: String,
    #[serde(rename = "venueId")]
    pub venue_id: String,
    #[serde(rename = "venueName")]
    pub venue_name: String,
    #[serde(rename = "userIds")]
    pub user_ids: Vec<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(rename = "partySize")]
    pub party_size: usize,
    pub status: BookingStatus,
    #[serde(rename = "reservationRef")]
    pub reservation_ref: Option<String>,
    #[serde(rename = "paymentRef")]
    pub payment_ref: Option<String>,
    /// Large parties get group handling (bigger table, coordinator ping)
    #[serde(rename = "groupBooking")]
    pub group_booking: bool,
    #[serde(rename = "failureReason")]
    pub failure_reason: Option<String>,
    #[serde(rename = "bookedAt")]
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    /// Advance the status, ignoring (and logging) illegal transitions
    pub fn advance(&mut self, next: BookingStatus) {
        if self.status.can_advance_to(next) {
            self.status = next;
        } else {
            tracing::warn!(
                "Ignoring illegal booking transition {:?} -> {:?} for {}",
                self.status,
                next,
                self.confirmation_code
            );
        }
    }
}

/// Weights for the venue recommendation score, must sum to 1.0
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub distance: f64,
    pub interests: f64,
    pub price: f64,
    pub history: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            distance: 0.25,
            interests: 0.35,
            price: 0.15,
            history: 0.25,
        }
    }
}

/// Weights for person-to-person compatibility, must sum to 1.0
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityWeights {
    pub shared_interests: f64,
    pub proximity: f64,
    pub price: f64,
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self {
            shared_interests: 0.40,
            proximity: 0.30,
            price: 0.30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_tier_rank_ordering() {
        assert!(PriceTier::Budget.rank() < PriceTier::Moderate.rank());
        assert!(PriceTier::Moderate.rank() < PriceTier::Upscale.rank());
        assert!(PriceTier::Upscale.rank() < PriceTier::Luxury.rank());
    }

    #[test]
    fn test_status_advances_forward_only() {
        assert!(BookingStatus::Created.can_advance_to(BookingStatus::Validated));
        assert!(BookingStatus::Validated.can_advance_to(BookingStatus::ReservationPending));
        assert!(!BookingStatus::ReservationPending.can_advance_to(BookingStatus::Created));
        assert!(!BookingStatus::PaymentConfirmed.can_advance_to(BookingStatus::Validated));
    }

    #[test]
    fn test_failed_reachable_from_any_non_terminal() {
        assert!(BookingStatus::Created.can_advance_to(BookingStatus::Failed));
        assert!(BookingStatus::PaymentPending.can_advance_to(BookingStatus::Failed));
        assert!(!BookingStatus::Failed.can_advance_to(BookingStatus::Failed));
        assert!(!BookingStatus::NotificationsSent.can_advance_to(BookingStatus::Failed));
    }

    #[test]
    fn test_terminal_states() {
        assert!(BookingStatus::NotificationsSent.is_terminal());
        assert!(BookingStatus::Failed.is_terminal());
        assert!(!BookingStatus::PaymentPending.is_terminal());
    }
}
