// src/places/models.rs

use serde::{Deserialize, Serialize};

// ============================================================================
// Place Models
// ============================================================================

/// A point of interest as stored in the search index.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub location: GeoPoint,
}

/// Geographic coordinate pair. After loading, `lat` is always within
/// [-90, 90] and `lon` within [-180, 180].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

// Paginated listing response
#[derive(Serialize, Debug)]
pub struct PlacesResponse {
    pub name: String,
    pub total: usize,
    pub places: Vec<Place>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<usize>,
    pub last_page: usize,
}

// Recommendation response
#[derive(Serialize, Debug)]
pub struct RecommendResponse {
    pub name: String,
    pub places: Vec<Place>,
}

/// Query parameters for the listing endpoints. Kept as raw strings so a
/// rejection can echo the offending value back to the client.
#[derive(Deserialize, Debug)]
pub struct PageParams {
    pub page: Option<String>,
}

/// Query parameters for the recommendation endpoint, raw for the same reason.
#[derive(Deserialize, Debug)]
pub struct RecommendParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}
