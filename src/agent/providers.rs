use crate::models::{PriceTier, Venue, VenueCategory};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by an external reservation or payment provider
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reservation request sent to a provider
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub venue_id: String,
    pub venue_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: usize,
    /// Large parties request a bigger table / group seating
    pub group_booking: bool,
}

/// A reservation held by a provider
#[derive(Debug, Clone)]
pub struct ReservationHold {
    pub reference: String,
    pub provider: &'static str,
}

/// Payment intent request for the whole party
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub confirmation_code: String,
    pub user_ids: Vec<String>,
    pub amount_cents: u64,
}

/// A confirmed payment intent
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub reference: String,
    pub provider: &'static str,
}

/// Capability contract for reservation backends (OpenTable, Resy,
/// Eventbrite). Production swaps in network-backed adapters without
/// touching the booking agent.
#[async_trait]
pub trait ReservationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn reserve(&self, request: &ReservationRequest)
        -> Result<ReservationHold, ProviderError>;

    /// Compensating action: release an already-held reservation
    async fn cancel(&self, reference: &str) -> Result<(), ProviderError>;
}

/// Capability contract for payment backends (Stripe)
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_intent(&self, request: &PaymentRequest)
        -> Result<PaymentIntent, ProviderError>;
}

fn simulated_reference(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    format!("{}-{}", prefix, rng.gen_range(100_000..1_000_000))
}

/// Simulated OpenTable integration for cafes and restaurants
#[derive(Debug, Default)]
pub struct OpenTableAdapter;

#[async_trait]
impl ReservationProvider for OpenTableAdapter {
    fn name(&self) -> &'static str {
        "opentable"
    }

    async fn reserve(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationHold, ProviderError> {
        let reference = simulated_reference("OT");
        tracing::info!(
            "OpenTable reservation {} held at {} for {} on {} {}",
            reference,
            request.venue_name,
            request.party_size,
            request.date,
            request.time
        );
        Ok(ReservationHold {
            reference,
            provider: self.name(),
        })
    }

    async fn cancel(&self, reference: &str) -> Result<(), ProviderError> {
        tracing::info!("OpenTable reservation {} cancelled", reference);
        Ok(())
    }
}

/// Simulated Resy integration for bars and upscale dining
#[derive(Debug, Default)]
pub struct ResyAdapter;

#[async_trait]
impl ReservationProvider for ResyAdapter {
    fn name(&self) -> &'static str {
        "resy"
    }

    async fn reserve(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationHold, ProviderError> {
        let reference = simulated_reference("RESY");
        tracing::info!(
            "Resy reservation {} held at {} for {}",
            reference,
            request.venue_name,
            request.party_size
        );
        Ok(ReservationHold {
            reference,
            provider: self.name(),
        })
    }

    async fn cancel(&self, reference: &str) -> Result<(), ProviderError> {
        tracing::info!("Resy reservation {} cancelled", reference);
        Ok(())
    }
}

/// Simulated Eventbrite integration for clubs, galleries, and event spaces
#[derive(Debug, Default)]
pub struct EventbriteAdapter;

#[async_trait]
impl ReservationProvider for EventbriteAdapter {
    fn name(&self) -> &'static str {
        "eventbrite"
    }

    async fn reserve(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationHold, ProviderError> {
        let reference = simulated_reference("EB");
        tracing::info!(
            "Eventbrite tickets {} reserved at {} for {}",
            reference,
            request.venue_name,
            request.party_size
        );
        Ok(ReservationHold {
            reference,
            provider: self.name(),
        })
    }

    async fn cancel(&self, reference: &str) -> Result<(), ProviderError> {
        tracing::info!("Eventbrite reservation {} cancelled", reference);
        Ok(())
    }
}

/// Simulated Stripe payment integration
#[derive(Debug, Default)]
pub struct StripeAdapter;

#[async_trait]
impl PaymentProvider for StripeAdapter {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_intent(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentIntent, ProviderError> {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..16)
            .map(|_| {
                let charset = b"abcdefghijklmnopqrstuvwxyz0123456789";
                charset[rng.gen_range(0..charset.len())] as char
            })
            .collect();
        let reference = format!("pi_{}", suffix);

        tracing::info!(
            "Stripe payment intent {} created for booking {} ({} cents, {} payers)",
            reference,
            request.confirmation_code,
            request.amount_cents,
            request.user_ids.len()
        );
        Ok(PaymentIntent {
            reference,
            provider: self.name(),
        })
    }
}

/// Deterministic reservation-provider selection by venue category
///
/// Each category maps to exactly one provider, so repeated bookings at the
/// same venue always go to the same backend.
#[derive(Clone)]
pub struct ProviderRegistry {
    opentable: Arc<dyn ReservationProvider>,
    resy: Arc<dyn ReservationProvider>,
    eventbrite: Arc<dyn ReservationProvider>,
}

impl ProviderRegistry {
    pub fn new(
        opentable: Arc<dyn ReservationProvider>,
        resy: Arc<dyn ReservationProvider>,
        eventbrite: Arc<dyn ReservationProvider>,
    ) -> Self {
        Self {
            opentable,
            resy,
            eventbrite,
        }
    }

    pub fn simulated() -> Self {
        Self::new(
            Arc::new(OpenTableAdapter),
            Arc::new(ResyAdapter),
            Arc::new(EventbriteAdapter),
        )
    }

    pub fn for_venue(&self, venue: &Venue) -> Arc<dyn ReservationProvider> {
        match venue.category {
            VenueCategory::Cafe | VenueCategory::Restaurant => Arc::clone(&self.opentable),
            VenueCategory::Bar => Arc::clone(&self.resy),
            VenueCategory::Club | VenueCategory::Gallery | VenueCategory::EventSpace => {
                Arc::clone(&self.eventbrite)
            }
        }
    }
}

/// Per-person cost estimate in cents used for simulated payment intents
pub fn estimated_cost_cents(tier: PriceTier) -> u64 {
    match tier {
        PriceTier::Budget => 1_500,
        PriceTier::Moderate => 3_500,
        PriceTier::Upscale => 9_000,
        PriceTier::Luxury => 15_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(category: VenueCategory) -> Venue {
        Venue {
            id: "v1".to_string(),
            name: "Test Venue".to_string(),
            category,
            latitude: 40.7580,
            longitude: -73.9855,
            price_tier: PriceTier::Moderate,
            tags: vec![],
            description: String::new(),
        }
    }

    #[test]
    fn test_provider_selection_is_deterministic_per_category() {
        let registry = ProviderRegistry::simulated();

        assert_eq!(registry.for_venue(&venue(VenueCategory::Cafe)).name(), "opentable");
        assert_eq!(registry.for_venue(&venue(VenueCategory::Restaurant)).name(), "opentable");
        assert_eq!(registry.for_venue(&venue(VenueCategory::Bar)).name(), "resy");
        assert_eq!(registry.for_venue(&venue(VenueCategory::Club)).name(), "eventbrite");
        assert_eq!(registry.for_venue(&venue(VenueCategory::Gallery)).name(), "eventbrite");
        assert_eq!(registry.for_venue(&venue(VenueCategory::EventSpace)).name(), "eventbrite");
    }

    #[tokio::test]
    async fn test_simulated_reserve_returns_reference() {
        let adapter = OpenTableAdapter;
        let request = ReservationRequest {
            venue_id: "v1".to_string(),
            venue_name: "Test Venue".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 25).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            party_size: 2,
            group_booking: false,
        };

        let hold = adapter.reserve(&request).await.unwrap();
        assert!(hold.reference.starts_with("OT-"));
        assert_eq!(hold.provider, "opentable");
    }

    #[tokio::test]
    async fn test_simulated_payment_reference_shape() {
        let adapter = StripeAdapter;
        let request = PaymentRequest {
            confirmation_code: "ABCD1234".to_string(),
            user_ids: vec!["u1".to_string(), "u2".to_string()],
            amount_cents: 7_000,
        };

        let intent = adapter.create_intent(&request).await.unwrap();
        assert!(intent.reference.starts_with("pi_"));
        assert_eq!(intent.reference.len(), 19);
    }

    #[test]
    fn test_cost_estimates_scale_with_tier() {
        assert!(estimated_cost_cents(PriceTier::Budget) < estimated_cost_cents(PriceTier::Moderate));
        assert!(estimated_cost_cents(PriceTier::Upscale) < estimated_cost_cents(PriceTier::Luxury));
    }
}
