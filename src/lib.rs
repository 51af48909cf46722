//! Luna Backend - recommendation engine and booking agent for the Luna
//! social venue discovery platform
//!
//! Two subsystems carry the logic: a multi-factor scoring engine that
//! produces explainable venue and people rankings, and a booking agent
//! that drives a sequential reservation/payment/notification workflow
//! against simulated external providers.

pub mod agent;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::agent::{BookingAgent, BookingError, BookingRequest, ConfirmationCodeGenerator};
pub use crate::core::{distance::haversine_distance, CompatibilityScorer, VenueRanker};
pub use crate::models::{
    Booking, BookingStatus, CompatibilityResult, PriceTier, User, Venue, VenueScoreResult,
};
pub use crate::services::{demo_dataset, Directory, InMemoryBookingStore, InMemoryDirectory};
