// Booking agent and its simulated external integrations
pub mod booking;
pub mod confirmation;
pub mod notify;
pub mod providers;

pub use booking::{BookingAgent, BookingError, BookingRequest, GROUP_SIZE_THRESHOLD};
pub use confirmation::ConfirmationCodeGenerator;
pub use notify::{NotificationDispatcher, NotificationError, Notifier};
pub use providers::{
    PaymentProvider, ProviderError, ProviderRegistry, ReservationProvider,
};
