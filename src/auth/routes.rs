//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /api/get_token` - Issue a signed, time-limited bearer token
pub fn auth_routes() -> Router {
    Router::new().route("/api/get_token", get(handlers::get_token))
}
