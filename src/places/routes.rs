// src/places/routes.rs

use axum::{routing::get, Router};

use super::handlers;

/// Create the places router.
///
/// Whether the recommendation endpoint sits behind the bearer gate is
/// decided here, once, from startup configuration; the handlers themselves
/// never branch on it.
pub fn places_routes(require_token: bool) -> Router {
    let router = Router::new()
        .route("/", get(handlers::html_listing))
        .route("/api/places", get(handlers::json_listing));

    if require_token {
        router.route("/api/recommend", get(handlers::recommend_gated))
    } else {
        router.route("/api/recommend", get(handlers::recommend))
    }
}
