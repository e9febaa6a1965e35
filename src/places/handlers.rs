// src/places/handlers.rs

use axum::{
    extract::{Extension, Query},
    response::{Html, Json},
};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

use crate::auth::RequireBearer;
use crate::common::{ApiError, AppState};
use crate::places::models::*;

/// Fixed page size for both listing views.
const PAGE_SIZE: usize = 10;

/// How many places a recommendation returns.
const RECOMMEND_LIMIT: usize = 3;

// ============================================================================
// Parameter parsing
// ============================================================================

/// Parse the 1-based `page` parameter, defaulting to 1. Non-integer or
/// non-positive values are rejected with the raw value echoed back.
fn parse_page(params: &PageParams) -> Result<usize, ApiError> {
    let raw = params.page.as_deref().unwrap_or("1");
    match raw.parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ApiError::BadRequest(format!(
            "invalid 'page' value: '{raw}'"
        ))),
    }
}

/// Parse one coordinate parameter, naming it in the rejection.
fn parse_coord(name: &str, value: Option<&str>) -> Result<f64, ApiError> {
    let raw = value.unwrap_or("");
    raw.parse::<f64>().map_err(|_| {
        ApiError::BadRequest(format!("invalid '{name}' value: '{raw}'"))
    })
}

// ============================================================================
// Pagination
// ============================================================================

#[derive(Debug, PartialEq)]
struct PageHints {
    prev: Option<usize>,
    next: Option<usize>,
    last: usize,
}

/// Derive prev/next/last hints for a page, rejecting pages past the end of
/// a non-empty collection.
fn page_hints(page: usize, total: usize) -> Result<PageHints, ApiError> {
    let last = (total + PAGE_SIZE - 1) / PAGE_SIZE;

    if total > 0 && page > last {
        return Err(ApiError::BadRequest(format!(
            "invalid 'page' value: '{page}'"
        )));
    }

    Ok(PageHints {
        prev: (page > 1).then(|| page - 1),
        next: (page < last).then(|| page + 1),
        last,
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/places - Paginated JSON listing
pub async fn json_listing(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let page = parse_page(&params)?;
    let offset = (page - 1) * PAGE_SIZE;

    let (places, total) = state.catalog.get_places(PAGE_SIZE, offset).await?;
    let hints = page_hints(page, total)?;

    debug!(page, total, count = places.len(), "Listing page served");

    Ok(Json(PlacesResponse {
        name: "Places".to_string(),
        total,
        places,
        prev_page: hints.prev,
        next_page: hints.next,
        last_page: hints.last,
    }))
}

/// GET / - Paginated HTML listing
pub async fn html_listing(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, ApiError> {
    let page = parse_page(&params)?;
    let offset = (page - 1) * PAGE_SIZE;

    let (places, total) = state.catalog.get_places(PAGE_SIZE, offset).await?;
    let hints = page_hints(page, total)?;

    Ok(Html(render_listing(&places, total, &hints)))
}

/// GET /api/recommend - Nearest places to a coordinate
pub async fn recommend(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendResponse>, ApiError> {
    recommend_inner(state, params).await
}

/// GET /api/recommend behind the bearer gate. Same behavior once the gate
/// lets the request through; which variant is routed is decided once at
/// startup.
pub async fn recommend_gated(
    _auth: RequireBearer,
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendResponse>, ApiError> {
    recommend_inner(state, params).await
}

async fn recommend_inner(
    state: Arc<AppState>,
    params: RecommendParams,
) -> Result<Json<RecommendResponse>, ApiError> {
    let lat = parse_coord("lat", params.lat.as_deref())?;
    let lon = parse_coord("lon", params.lon.as_deref())?;

    let places = state.search.nearest_to(lat, lon, RECOMMEND_LIMIT).await?;

    debug!(lat, lon, count = places.len(), "Recommendation served");

    Ok(Json(RecommendResponse {
        name: "Recommendation".to_string(),
        places,
    }))
}

// ============================================================================
// HTML view
// ============================================================================

fn render_listing(places: &[Place], total: usize, hints: &PageHints) -> String {
    let mut html = format!(
        r#"<!doctype html>
<html>
<head>
    <meta charset="utf-8">
    <title>Places</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
    .pagination a {{
        margin-right: 15px;
    }}
    </style>
</head>
<body>
<h5>Total: {total}</h5>
<ul>"#
    );

    for place in places {
        let _ = write!(
            html,
            r#"<li>
            <div>{}</div>
            <div>{}</div>
            <div>{}</div>
        </li>"#,
            place.name, place.address, place.phone
        );
    }

    html.push_str(r#"</ul><div class="pagination">"#);
    if let Some(prev) = hints.prev {
        let _ = write!(html, r#"<a href="?page=1">&laquo; First</a>"#);
        let _ = write!(html, r#"<a href="?page={prev}">&laquo; Previous</a>"#);
    }
    if let Some(next) = hints.next {
        let _ = write!(html, r#"<a href="?page={next}">Next &raquo;</a>"#);
        let _ = write!(html, r#"<a href="?page={}">Last &raquo;</a>"#, hints.last);
    }
    html.push_str("</div>\n</body>\n</html>");

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::models::GeoPoint;

    fn params(page: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_parse_page_defaults_to_one() {
        assert_eq!(parse_page(&params(None)).unwrap(), 1);
    }

    #[test]
    fn test_parse_page_accepts_positive_integers() {
        assert_eq!(parse_page(&params(Some("3"))).unwrap(), 3);
    }

    #[test]
    fn test_parse_page_rejects_bad_values() {
        for bad in ["0", "-1", "abc", "1.5", ""] {
            let err = parse_page(&params(Some(bad))).unwrap_err();
            match err {
                ApiError::BadRequest(msg) => {
                    assert!(msg.contains(bad), "message should echo '{bad}': {msg}")
                }
                other => panic!("expected BadRequest, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_coord_names_the_offending_parameter() {
        let err = parse_coord("lat", Some("abc")).unwrap_err();
        match err {
            ApiError::BadRequest(msg) => {
                assert!(msg.contains("'lat'"));
                assert!(msg.contains("'abc'"));
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }

        let err = parse_coord("lon", Some("xyz")).unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert!(msg.contains("'lon'")),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_coord_missing_value() {
        assert!(parse_coord("lat", None).is_err());
        assert_eq!(parse_coord("lat", Some("55.674")).unwrap(), 55.674);
    }

    #[test]
    fn test_page_hints_last_page_is_ceiling() {
        assert_eq!(page_hints(1, 25).unwrap().last, 3);
        assert_eq!(page_hints(1, 30).unwrap().last, 3);
        assert_eq!(page_hints(1, 31).unwrap().last, 4);
        assert_eq!(page_hints(1, 5).unwrap().last, 1);
    }

    #[test]
    fn test_page_hints_first_page_has_no_prev() {
        let hints = page_hints(1, 25).unwrap();
        assert_eq!(hints.prev, None);
        assert_eq!(hints.next, Some(2));
    }

    #[test]
    fn test_page_hints_last_page_has_no_next() {
        let hints = page_hints(3, 25).unwrap();
        assert_eq!(hints.prev, Some(2));
        assert_eq!(hints.next, None);
    }

    #[test]
    fn test_page_hints_rejects_page_past_the_end() {
        let err = page_hints(4, 25).unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert!(msg.contains("'4'")),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_page_hints_empty_collection_allows_page_one() {
        let hints = page_hints(1, 0).unwrap();
        assert_eq!(hints.prev, None);
        assert_eq!(hints.next, None);
        assert_eq!(hints.last, 0);
    }

    #[test]
    fn test_render_listing_shows_total_and_rows() {
        let places = vec![Place {
            id: 1,
            name: "Cafe".to_string(),
            address: "Street 1".to_string(),
            phone: "555-0101".to_string(),
            location: GeoPoint {
                lat: 55.0,
                lon: 37.0,
            },
        }];
        let hints = page_hints(1, 1).unwrap();

        let html = render_listing(&places, 1, &hints);
        assert!(html.contains("Total: 1"));
        assert!(html.contains("Cafe"));
        assert!(!html.contains("Previous"));
        assert!(!html.contains("Next"));
    }
}
