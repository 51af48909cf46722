pub mod api;

pub use api::AppState;

/// Configure all application routes
pub fn configure_routes(cfg: &mut actix_web::web::ServiceConfig) {
    api::configure(cfg);
}
