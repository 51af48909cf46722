use crate::agent::{BookingAgent, BookingError, BookingRequest};
use crate::core::VenueRanker;
use crate::models::{CreateBookingRequest, ErrorResponse, HealthResponse, RankQuery};
use crate::services::{BookingStore, Directory};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Hard cap on venue recommendations per request
const MAX_TOP_N: usize = 20;
const DEFAULT_VENUE_TOP_N: usize = 5;
const DEFAULT_PEOPLE_TOP_N: usize = 10;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn Directory>,
    pub bookings: Arc<dyn BookingStore>,
    pub ranker: Arc<VenueRanker>,
    pub agent: Arc<BookingAgent>,
}

/// Configure all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/users", web::get().to(list_users))
        .route("/users/{user_id}", web::get().to(get_user))
        .route("/venues", web::get().to(list_venues))
        .route("/venues/{venue_id}", web::get().to(get_venue))
        .route(
            "/recommendations/venues/{user_id}",
            web::get().to(recommend_venues),
        )
        .route(
            "/recommendations/people/{user_id}",
            web::get().to(recommend_people),
        )
        .route("/bookings", web::post().to(create_booking))
        .route("/bookings/{code}", web::get().to(get_booking));
}

fn not_found(message: String) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "not_found".to_string(),
        message,
        status_code: 404,
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

async fn list_users(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.directory.list_users())
}

async fn get_user(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    match state.directory.get_user(&user_id) {
        Some(user) => HttpResponse::Ok().json(user),
        None => not_found(format!("User {} not found", user_id)),
    }
}

async fn list_venues(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.directory.list_venues())
}

async fn get_venue(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let venue_id = path.into_inner();
    match state.directory.get_venue(&venue_id) {
        Some(venue) => HttpResponse::Ok().json(venue),
        None => not_found(format!("Venue {} not found", venue_id)),
    }
}

/// Personalized venue recommendations
///
/// GET /recommendations/venues/{user_id}?topN=5
async fn recommend_venues(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RankQuery>,
) -> impl Responder {
    let user_id = path.into_inner();
    let user = match state.directory.get_user(&user_id) {
        Some(user) => user,
        None => return not_found(format!("User {} not found", user_id)),
    };

    let top_n = query.top_n.unwrap_or(DEFAULT_VENUE_TOP_N).min(MAX_TOP_N);
    let venues = state.directory.list_venues();
    let users = state.directory.list_users();

    let results = state.ranker.rank_venues(&user, &venues, &users, Some(top_n));

    tracing::info!(
        "Returning {} venue recommendations for user {}",
        results.len(),
        user_id
    );
    HttpResponse::Ok().json(results)
}

/// Compatible people recommendations
///
/// GET /recommendations/people/{user_id}?topN=10
async fn recommend_people(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RankQuery>,
) -> impl Responder {
    let user_id = path.into_inner();
    let user = match state.directory.get_user(&user_id) {
        Some(user) => user,
        None => return not_found(format!("User {} not found", user_id)),
    };

    let top_n = query.top_n.unwrap_or(DEFAULT_PEOPLE_TOP_N).min(MAX_TOP_N);
    let users = state.directory.list_users();

    let results = state.ranker.rank_people(&user, &users, Some(top_n));
    HttpResponse::Ok().json(results)
}

/// Create a booking for a group at a venue
///
/// POST /bookings
///
/// Request body:
/// ```json
/// {
///   "venueId": "venue1",
///   "userIds": ["user1", "user2"],
///   "date": "2025-11-25",
///   "time": "19:00",
///   "partySize": 2
/// }
/// ```
async fn create_booking(
    state: web::Data<AppState>,
    req: web::Json<CreateBookingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request = BookingRequest {
        venue_id: req.venue_id.clone(),
        user_ids: req.user_ids.clone(),
        date: req.date.clone(),
        time: req.time.clone(),
        party_size: req.party_size,
    };

    match state.agent.create_booking(request).await {
        Ok(booking) => HttpResponse::Ok().json(booking),
        Err(e) => booking_error_response(e),
    }
}

/// Look up a booking by confirmation code
async fn get_booking(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let code = path.into_inner();
    match state.bookings.get(&code) {
        Some(booking) => HttpResponse::Ok().json(booking),
        None => not_found(format!("Booking {} not found", code)),
    }
}

/// Map structured booking failures to HTTP responses
fn booking_error_response(error: BookingError) -> HttpResponse {
    let status_code = match &error {
        BookingError::UserNotFound(_) | BookingError::VenueNotFound(_) => 404,
        BookingError::PartySizeMismatch { .. } | BookingError::InvalidDateTime(_) => 400,
        BookingError::ReservationProviderFailure(_)
        | BookingError::PaymentProviderFailure(_) => 502,
    };

    let body = ErrorResponse {
        error: error.kind().to_string(),
        message: error.to_string(),
        status_code,
    };

    match status_code {
        404 => HttpResponse::NotFound().json(body),
        400 => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::BadGateway().json(body),
    }
}
