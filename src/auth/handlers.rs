// src/auth/handlers.rs

use axum::{extract::Extension, response::Json};
use chrono::Duration;
use std::sync::Arc;
use tracing::error;

use super::models::TokenResponse;
use crate::common::{ApiError, AppState};

/// Subject and lifetime for demo tokens handed out by the token endpoint.
const TOKEN_SUBJECT: &str = "Nikola";
const TOKEN_TTL_HOURS: i64 = 1;

/// GET /api/get_token - Issue a fresh one-hour admin token
pub async fn get_token(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .tokens
        .issue(TOKEN_SUBJECT, true, Duration::hours(TOKEN_TTL_HOURS))
        .map_err(|e| {
            error!(error = %e, "Token signing failed");
            ApiError::InternalServer("Error creating token".to_string())
        })?;

    Ok(Json(TokenResponse { token }))
}
