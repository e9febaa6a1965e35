//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::common::{ApiError, AppState};

/// Bearer-token gate for protected routes.
///
/// Validates the `Authorization` header against the token authority and
/// then lets the request through. A missing header is reported to the
/// client as "missing token", everything else as "invalid token"; the
/// claims themselves are not propagated past the gate.
#[derive(Debug)]
pub struct RequireBearer;

#[async_trait]
impl<S> FromRequestParts<S> for RequireBearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match header {
            Some(value) => value,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing token".into()));
            }
        };

        // Handle "Bearer <token>" format or a raw token
        let bare_token = token.strip_prefix("Bearer ").unwrap_or(token);

        match app_state.tokens.validate(bare_token) {
            Ok(claims) => {
                debug!(subject = %claims.sub, "Bearer token accepted");
                Ok(RequireBearer)
            }
            Err(e) => {
                warn!(error = %e, "Bearer token rejected");
                Err(ApiError::Unauthorized("invalid token".into()))
            }
        }
    }
}
