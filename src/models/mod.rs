pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Booking, BookingStatus, CompatibilityResult, CompatibilityWeights, NotificationChannel,
    PriceTier, ScoringWeights, User, Venue, VenueCategory, VenueScoreResult,
};
pub use requests::{CreateBookingRequest, RankQuery};
pub use responses::{ErrorResponse, HealthResponse};
