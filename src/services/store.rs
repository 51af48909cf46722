use crate::models::{Booking, User, Venue};
use std::collections::HashMap;
use std::sync::RwLock;

/// Read-only access to the user/venue dataset
///
/// The scoring engine and booking agent only see this interface, so the
/// in-memory seed data can be swapped for a real backend without touching
/// algorithm code.
pub trait Directory: Send + Sync {
    fn get_user(&self, id: &str) -> Option<User>;
    fn get_venue(&self, id: &str) -> Option<Venue>;
    fn list_users(&self) -> Vec<User>;
    fn list_venues(&self) -> Vec<Venue>;
}

/// Persisted booking records, keyed by confirmation code
pub trait BookingStore: Send + Sync {
    fn save(&self, booking: Booking);
    fn get(&self, confirmation_code: &str) -> Option<Booking>;
}

/// In-memory directory over an immutable dataset snapshot
pub struct InMemoryDirectory {
    users: HashMap<String, User>,
    venues: HashMap<String, Venue>,
}

impl InMemoryDirectory {
    pub fn new(users: Vec<User>, venues: Vec<Venue>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            venues: venues.into_iter().map(|v| (v.id.clone(), v)).collect(),
        }
    }
}

impl Directory for InMemoryDirectory {
    fn get_user(&self, id: &str) -> Option<User> {
        self.users.get(id).cloned()
    }

    fn get_venue(&self, id: &str) -> Option<Venue> {
        self.venues.get(id).cloned()
    }

    fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        users
    }

    fn list_venues(&self) -> Vec<Venue> {
        let mut venues: Vec<Venue> = self.venues.values().cloned().collect();
        venues.sort_by(|a, b| a.id.cmp(&b.id));
        venues
    }
}

/// In-memory booking store; durability is out of scope
#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: RwLock<HashMap<String, Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookingStore for InMemoryBookingStore {
    fn save(&self, booking: Booking) {
        match self.bookings.write() {
            Ok(mut guard) => {
                guard.insert(booking.confirmation_code.clone(), booking);
            }
            Err(poisoned) => {
                poisoned
                    .into_inner()
                    .insert(booking.confirmation_code.clone(), booking);
            }
        }
    }

    fn get(&self, confirmation_code: &str) -> Option<Booking> {
        match self.bookings.read() {
            Ok(guard) => guard.get(confirmation_code).cloned(),
            Err(poisoned) => poisoned.into_inner().get(confirmation_code).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed::demo_dataset;

    #[test]
    fn test_directory_lookup() {
        let (users, venues) = demo_dataset();
        let directory = InMemoryDirectory::new(users, venues);

        assert!(directory.get_user("user1").is_some());
        assert!(directory.get_user("nope").is_none());
        assert!(directory.get_venue("venue1").is_some());
        assert!(directory.get_venue("nope").is_none());
    }

    #[test]
    fn test_listings_are_sorted() {
        let (users, venues) = demo_dataset();
        let directory = InMemoryDirectory::new(users, venues);

        let ids: Vec<String> = directory.list_users().iter().map(|u| u.id.clone()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        assert_eq!(directory.list_venues().len(), 6);
    }
}
