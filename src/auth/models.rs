//! Authentication data models

use serde::{Deserialize, Serialize};

/// JWT claims structure. Built once at issuance and never mutated; it only
/// exists as the signed token's payload.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String,
    pub admin: bool,
    pub exp: usize,
}

/// Response body for the token endpoint
#[derive(Serialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}
