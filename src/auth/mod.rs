//! # Auth Module
//!
//! This module handles the token side of the service:
//! - Token issuance (signed, time-limited claims)
//! - Token validation with a pinned signing algorithm
//! - RequireBearer extractor gating protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod tokens;


pub use extractors::RequireBearer;
pub use routes::auth_routes;
pub use tokens::TokenAuthority;
