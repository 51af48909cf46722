use crate::agent::confirmation::ConfirmationCodeGenerator;
use crate::agent::notify::NotificationDispatcher;
use crate::agent::providers::{
    estimated_cost_cents, PaymentProvider, PaymentRequest, ProviderRegistry, ReservationHold,
    ReservationProvider, ReservationRequest, StripeAdapter,
};
use crate::models::{Booking, BookingStatus, User, Venue};
use crate::services::{BookingStore, Directory};
use chrono::{NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Default party size at which a booking gets group handling
pub const GROUP_SIZE_THRESHOLD: usize = 4;

/// Structured booking failure, surfaced to the API layer with a kind
/// the caller can map to a response code
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("venue {0} not found")]
    VenueNotFound(String),
    #[error("party size {party_size} does not match {user_count} attendees")]
    PartySizeMismatch {
        party_size: usize,
        user_count: usize,
    },
    #[error("invalid date or time: {0}")]
    InvalidDateTime(String),
    #[error("reservation provider failure: {0}")]
    ReservationProviderFailure(String),
    #[error("payment provider failure: {0}")]
    PaymentProviderFailure(String),
}

impl BookingError {
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::UserNotFound(_) => "user_not_found",
            BookingError::VenueNotFound(_) => "venue_not_found",
            BookingError::PartySizeMismatch { .. } => "party_size_mismatch",
            BookingError::InvalidDateTime(_) => "invalid_date_time",
            BookingError::ReservationProviderFailure(_) => "reservation_provider_failure",
            BookingError::PaymentProviderFailure(_) => "payment_provider_failure",
        }
    }
}

/// Booking request as seen by the agent, already past schema validation
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub venue_id: String,
    pub user_ids: Vec<String>,
    pub date: String,
    pub time: String,
    pub party_size: usize,
}

/// Automated booking agent
///
/// Runs one booking request as a strict sequential workflow:
///
/// Created -> Validated -> ReservationPending -> ReservationConfirmed
///         -> PaymentPending -> PaymentConfirmed -> NotificationsSent
///
/// with Failed terminal from any non-terminal state. Validation failures
/// make no external calls. A payment failure cancels the held reservation
/// before failing. Notification problems never revert a confirmed booking.
pub struct BookingAgent {
    directory: Arc<dyn Directory>,
    store: Arc<dyn BookingStore>,
    reservations: ProviderRegistry,
    payments: Arc<dyn PaymentProvider>,
    notifications: NotificationDispatcher,
    codes: Arc<ConfirmationCodeGenerator>,
    group_size_threshold: usize,
}

impl BookingAgent {
    pub fn new(
        directory: Arc<dyn Directory>,
        store: Arc<dyn BookingStore>,
        reservations: ProviderRegistry,
        payments: Arc<dyn PaymentProvider>,
        notifications: NotificationDispatcher,
        codes: Arc<ConfirmationCodeGenerator>,
        group_size_threshold: usize,
    ) -> Self {
        Self {
            directory,
            store,
            reservations,
            payments,
            notifications,
            codes,
            group_size_threshold,
        }
    }

    /// Agent wired to the simulated providers and notifiers
    pub fn simulated(directory: Arc<dyn Directory>, store: Arc<dyn BookingStore>) -> Self {
        Self::new(
            directory,
            store,
            ProviderRegistry::simulated(),
            Arc::new(StripeAdapter),
            NotificationDispatcher::simulated(),
            Arc::new(ConfirmationCodeGenerator::default()),
            GROUP_SIZE_THRESHOLD,
        )
    }

    /// Run the full booking workflow for one request
    pub async fn create_booking(&self, request: BookingRequest) -> Result<Booking, BookingError> {
        // Created -> Validated. Fail-fast: no external calls, nothing
        // persisted on a validation error.
        let (venue, users, mut booking) = self.validate(&request)?;
        self.store.save(booking.clone());

        info!(
            "Booking {} validated for {} at {} ({} people)",
            booking.confirmation_code,
            booking.date,
            venue.name,
            booking.party_size
        );

        // Validated -> ReservationPending -> ReservationConfirmed
        let provider = self.reservations.for_venue(&venue);
        let hold = match self.hold_reservation(&venue, provider.as_ref(), &mut booking).await {
            Ok(hold) => hold,
            Err(e) => return Err(self.fail(booking, e)),
        };

        // ReservationConfirmed -> PaymentPending -> PaymentConfirmed
        if let Err(e) = self.capture_payment(&venue, &mut booking).await {
            // Compensate: release the held reservation exactly once. A
            // failed cancel is logged but must not mask the payment error.
            match provider.cancel(&hold.reference).await {
                Ok(()) => info!(
                    "Cancelled reservation {} after payment failure",
                    hold.reference
                ),
                Err(cancel_err) => error!(
                    "Compensating cancel of {} failed: {}",
                    hold.reference, cancel_err
                ),
            }
            return Err(self.fail(booking, e));
        }

        // PaymentConfirmed -> NotificationsSent. Best-effort only.
        self.dispatch_notifications(&venue, &users, &booking).await;
        booking.advance(BookingStatus::NotificationsSent);
        self.store.save(booking.clone());

        info!("Booking {} complete", booking.confirmation_code);
        Ok(booking)
    }

    /// Created -> Validated
    fn validate(
        &self,
        request: &BookingRequest,
    ) -> Result<(Venue, Vec<User>, Booking), BookingError> {
        let venue = self
            .directory
            .get_venue(&request.venue_id)
            .ok_or_else(|| BookingError::VenueNotFound(request.venue_id.clone()))?;

        let mut users = Vec::with_capacity(request.user_ids.len());
        for user_id in &request.user_ids {
            let user = self
                .directory
                .get_user(user_id)
                .ok_or_else(|| BookingError::UserNotFound(user_id.clone()))?;
            users.push(user);
        }

        if request.party_size != request.user_ids.len() {
            return Err(BookingError::PartySizeMismatch {
                party_size: request.party_size,
                user_count: request.user_ids.len(),
            });
        }

        let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
            .map_err(|e| BookingError::InvalidDateTime(format!("date '{}': {}", request.date, e)))?;
        let time = NaiveTime::parse_from_str(&request.time, "%H:%M")
            .map_err(|e| BookingError::InvalidDateTime(format!("time '{}': {}", request.time, e)))?;

        let mut booking = Booking {
            confirmation_code: self.codes.generate(),
            venue_id: venue.id.clone(),
            venue_name: venue.name.clone(),
            user_ids: request.user_ids.clone(),
            date,
            time,
            party_size: request.party_size,
            status: BookingStatus::Created,
            reservation_ref: None,
            payment_ref: None,
            group_booking: request.party_size >= self.group_size_threshold,
            failure_reason: None,
            booked_at: Utc::now(),
        };
        booking.advance(BookingStatus::Validated);

        Ok((venue, users, booking))
    }

    /// Validated -> ReservationPending -> ReservationConfirmed
    async fn hold_reservation(
        &self,
        venue: &Venue,
        provider: &dyn ReservationProvider,
        booking: &mut Booking,
    ) -> Result<ReservationHold, BookingError> {
        booking.advance(BookingStatus::ReservationPending);
        self.store.save(booking.clone());

        let request = ReservationRequest {
            venue_id: venue.id.clone(),
            venue_name: venue.name.clone(),
            date: booking.date,
            time: booking.time,
            party_size: booking.party_size,
            group_booking: booking.group_booking,
        };

        let hold = provider
            .reserve(&request)
            .await
            .map_err(|e| BookingError::ReservationProviderFailure(e.message))?;

        booking.reservation_ref = Some(hold.reference.clone());
        booking.advance(BookingStatus::ReservationConfirmed);
        self.store.save(booking.clone());
        Ok(hold)
    }

    /// ReservationConfirmed -> PaymentPending -> PaymentConfirmed
    async fn capture_payment(
        &self,
        venue: &Venue,
        booking: &mut Booking,
    ) -> Result<(), BookingError> {
        booking.advance(BookingStatus::PaymentPending);
        self.store.save(booking.clone());

        let request = PaymentRequest {
            confirmation_code: booking.confirmation_code.clone(),
            user_ids: booking.user_ids.clone(),
            amount_cents: estimated_cost_cents(venue.price_tier) * booking.party_size as u64,
        };

        let intent = self
            .payments
            .create_intent(&request)
            .await
            .map_err(|e| BookingError::PaymentProviderFailure(e.message))?;

        booking.payment_ref = Some(intent.reference);
        booking.advance(BookingStatus::PaymentConfirmed);
        self.store.save(booking.clone());
        Ok(())
    }

    /// PaymentConfirmed -> NotificationsSent (best-effort)
    async fn dispatch_notifications(&self, venue: &Venue, users: &[User], booking: &Booking) {
        let message = format!(
            "Booking {} confirmed: {} on {} at {}",
            booking.confirmation_code, venue.name, booking.date, booking.time
        );

        let failures = self.notifications.notify_party(users, &message).await;
        if failures > 0 {
            warn!(
                "{} notification(s) dropped for booking {}",
                failures, booking.confirmation_code
            );
        }

        if booking.group_booking {
            if let Some(coordinator) = users.first() {
                let group_message = format!(
                    "You are coordinating a group of {} at {} - a larger table was requested",
                    booking.party_size, venue.name
                );
                if let Err(e) = self.notifications.notify(coordinator, &group_message).await {
                    warn!("Coordinator notification dropped: {}", e);
                }
            }
        }
    }

    /// Terminal Failed transition: record the reason and persist
    fn fail(&self, mut booking: Booking, error: BookingError) -> BookingError {
        warn!("Booking {} failed: {}", booking.confirmation_code, error);
        booking.advance(BookingStatus::Failed);
        booking.failure_reason = Some(error.to_string());
        self.store.save(booking);
        error
    }
}
