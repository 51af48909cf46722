// Data access services
pub mod seed;
pub mod store;

pub use seed::demo_dataset;
pub use store::{BookingStore, Directory, InMemoryBookingStore, InMemoryDirectory};
