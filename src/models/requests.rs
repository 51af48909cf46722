use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a booking for a group at a venue
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "venue_id", rename = "venueId")]
    pub venue_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "user_ids", rename = "userIds")]
    pub user_ids: Vec<String>,
    /// YYYY-MM-DD
    #[validate(length(min = 1))]
    pub date: String,
    /// HH:MM
    #[validate(length(min = 1))]
    pub time: String,
    #[validate(range(min = 1, max = 50))]
    #[serde(alias = "party_size", rename = "partySize")]
    pub party_size: usize,
}

/// Query parameters for the recommendation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankQuery {
    #[serde(alias = "top_n", rename = "topN", default)]
    pub top_n: Option<usize>,
}
