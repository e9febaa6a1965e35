// src/services/search.rs
//! Elasticsearch-compatible document store client
//!
//! Owns the index schema, the startup bulk load, and the two read queries
//! the handlers need: a paginated id-ordered listing and a nearest-by-
//! distance lookup. Query bodies are built by pure functions and responses
//! are decoded into typed mirrors of the documented wire shape, so a
//! malformed backend reply surfaces as [`SearchError`] instead of a
//! half-decoded result.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::places::models::Place;

/// Index holding all place documents.
const INDEX: &str = "places";

/// The listing pages through the whole collection, so the result window
/// must be raised past the engine's 10,000 default.
const MAX_RESULT_WINDOW: u32 = 20_000;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("bulk load error: {0}")]
    Bulk(String),
    #[error("query error: {0}")]
    Query(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Wire types
// ============================================================================

/// Typed mirror of the search response shape:
/// `{hits: {total: {value}, hits: [{_source}]}}`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    total: TotalHits,
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct TotalHits {
    value: i64,
}

#[derive(Debug, Deserialize)]
struct Hit {
    /// Left untyped so one undecodable document can be skipped without
    /// failing the whole page.
    #[serde(rename = "_source")]
    source: Value,
}

/// Geo queries share the hit list but carry no exact total.
#[derive(Debug, Deserialize)]
struct GeoSearchResponse {
    hits: GeoHits,
}

#[derive(Debug, Deserialize)]
struct GeoHits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
    #[serde(default)]
    items: Vec<Value>,
}

// ============================================================================
// Query bodies
// ============================================================================

fn listing_query(limit: usize, offset: usize) -> Value {
    json!({
        "query": { "match_all": {} },
        "sort": [{ "id": "asc" }],
        "from": offset,
        "size": limit,
        "track_total_hits": true,
    })
}

fn nearest_query(lat: f64, lon: f64, limit: usize) -> Value {
    json!({
        "query": { "match_all": {} },
        "sort": [{
            "_geo_distance": {
                "location": { "lat": lat, "lon": lon },
                "order": "asc",
                "unit": "km",
            }
        }],
        "size": limit,
    })
}

fn index_schema() -> Value {
    json!({
        "settings": {
            "index": { "max_result_window": MAX_RESULT_WINDOW }
        },
        "mappings": {
            "properties": {
                "id": { "type": "long" },
                "name": { "type": "text" },
                "address": { "type": "text" },
                "phone": { "type": "text" },
                "location": { "type": "geo_point" }
            }
        }
    })
}

/// Newline-delimited action/document pairs for a `_bulk` request. The
/// document `_id` is the place's own id so listing order and geo queries
/// round-trip the same identifiers.
fn bulk_body(places: &[Place]) -> Result<String, SearchError> {
    let mut body = String::new();
    for place in places {
        let action = json!({ "index": { "_index": INDEX, "_id": place.id } });
        let doc = serde_json::to_string(place)
            .map_err(|e| SearchError::Bulk(format!("failed to serialize place: {e}")))?;
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&doc);
        body.push('\n');
    }
    Ok(body)
}

/// Failure reasons reported per item in a bulk response.
fn bulk_item_errors(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| {
            let (_op, detail) = item.as_object()?.iter().next()?;
            let error = detail.get("error")?;
            let id = detail.get("_id").and_then(Value::as_str).unwrap_or("?");
            Some(format!("document {id}: {error}"))
        })
        .collect()
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for the document store. One instance is built at startup and
/// shared by every component that talks to the index.
#[derive(Debug, Clone)]
pub struct SearchStore {
    client: Client,
    base_url: String,
}

impl SearchStore {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Verify the cluster is reachable and log its identity.
    pub async fn ping(&self) -> Result<(), SearchError> {
        let response = self.client.get(&self.base_url).send().await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::InvalidResponse(format!(
                "cluster info request failed: {text}"
            )));
        }

        let info: Value = response.json().await?;
        info!(
            cluster = info["cluster_name"].as_str().unwrap_or("unknown"),
            version = info["version"]["number"].as_str().unwrap_or("unknown"),
            "Connected to search cluster"
        );
        Ok(())
    }

    /// Drop any existing `places` index and recreate it with the raised
    /// result window and the place mapping. Destructive on purpose: every
    /// boot starts from an empty index.
    pub async fn ensure_schema(&self) -> Result<(), SearchError> {
        let delete = self
            .client
            .delete(format!("{}/{}", self.base_url, INDEX))
            .query(&[("ignore_unavailable", "true")])
            .send()
            .await?;

        // A missing index is fine; anything else refusing the delete is not.
        if !delete.status().is_success() && delete.status().as_u16() != 404 {
            let text = delete.text().await.unwrap_or_default();
            return Err(SearchError::Schema(format!(
                "failed to delete index: {text}"
            )));
        }

        let create = self
            .client
            .put(format!("{}/{}", self.base_url, INDEX))
            .json(&index_schema())
            .send()
            .await?;

        if !create.status().is_success() {
            let text = create.text().await.unwrap_or_default();
            return Err(SearchError::Schema(format!(
                "failed to create index: {text}"
            )));
        }

        info!(index = INDEX, "Index created");
        Ok(())
    }

    /// Write every place in one batched request. Succeeds only if the
    /// response reports zero item errors.
    pub async fn bulk_load(&self, places: &[Place]) -> Result<(), SearchError> {
        let body = bulk_body(places)?;

        let response = self
            .client
            .post(format!("{}/_bulk", self.base_url))
            // documents must be searchable before the listener comes up
            .query(&[("refresh", "true")])
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::Bulk(format!("bulk request failed: {text}")));
        }

        let bulk: BulkResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(format!("bulk response: {e}")))?;

        if bulk.errors {
            let reasons = bulk_item_errors(&bulk.items);
            return Err(SearchError::Bulk(reasons.join("; ")));
        }

        info!(count = places.len(), "Bulk load complete");
        Ok(())
    }

    /// Paginated listing ordered ascending by id, with an exact total.
    pub async fn list_places(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Place>, usize), SearchError> {
        let response = self
            .client
            .post(format!("{}/{}/_search", self.base_url, INDEX))
            .json(&listing_query(limit, offset))
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::Query(format!("listing failed: {text}")));
        }

        let decoded: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(format!("listing response: {e}")))?;

        let total = decoded.hits.total.value.max(0) as usize;
        let places = collect_places(decoded.hits.hits);

        debug!(
            count = places.len(),
            total, offset, "Listing query complete"
        );

        Ok((places, total))
    }

    /// Up to `limit` places ordered by ascending distance from the given
    /// coordinate. An empty index yields an empty list, not an error.
    pub async fn nearest_to(
        &self,
        lat: f64,
        lon: f64,
        limit: usize,
    ) -> Result<Vec<Place>, SearchError> {
        let response = self
            .client
            .post(format!("{}/{}/_search", self.base_url, INDEX))
            .json(&nearest_query(lat, lon, limit))
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::Query(format!("geo query failed: {text}")));
        }

        let decoded: GeoSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(format!("geo response: {e}")))?;

        let places = collect_places(decoded.hits.hits);

        debug!(count = places.len(), lat, lon, "Geo query complete");

        Ok(places)
    }
}

/// Decode each hit's `_source` into a [`Place`], skipping documents that do
/// not deserialize. One corrupt stored document must not fail the page.
fn collect_places(hits: Vec<Hit>) -> Vec<Place> {
    hits.into_iter()
        .filter_map(|hit| match serde_json::from_value::<Place>(hit.source) {
            Ok(place) => Some(place),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable document");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::models::GeoPoint;

    fn place(id: i64) -> Place {
        Place {
            id,
            name: format!("Place {id}"),
            address: format!("Street {id}"),
            phone: "555-0100".to_string(),
            location: GeoPoint {
                lat: 55.0 + id as f64,
                lon: 37.0,
            },
        }
    }

    #[test]
    fn test_listing_query_shape() {
        let body = listing_query(10, 30);

        assert_eq!(body["from"], 30);
        assert_eq!(body["size"], 10);
        assert_eq!(body["sort"][0]["id"], "asc");
        assert_eq!(body["track_total_hits"], true);
        assert!(body["query"]["match_all"].is_object());
    }

    #[test]
    fn test_nearest_query_shape() {
        let body = nearest_query(55.674, 37.666, 3);

        let sort = &body["sort"][0]["_geo_distance"];
        assert_eq!(sort["location"]["lat"], 55.674);
        assert_eq!(sort["location"]["lon"], 37.666);
        assert_eq!(sort["order"], "asc");
        assert_eq!(sort["unit"], "km");
        assert_eq!(body["size"], 3);
    }

    #[test]
    fn test_index_schema_raises_result_window() {
        let schema = index_schema();

        assert_eq!(schema["settings"]["index"]["max_result_window"], 20_000);
        assert_eq!(schema["mappings"]["properties"]["id"]["type"], "long");
        assert_eq!(
            schema["mappings"]["properties"]["location"]["type"],
            "geo_point"
        );
    }

    #[test]
    fn test_bulk_body_pairs_action_with_document() {
        let places = vec![place(1), place(2)];
        let body = bulk_body(&places).unwrap();

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 4);

        let action: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(action["index"]["_index"], "places");
        assert_eq!(action["index"]["_id"], 1);

        let doc: Place = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(doc, places[0]);

        let second_action: Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(second_action["index"]["_id"], 2);
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn test_bulk_item_errors_are_aggregated() {
        let response: BulkResponse = serde_json::from_str(
            r#"{
                "errors": true,
                "items": [
                    {"index": {"_id": "1", "status": 201}},
                    {"index": {"_id": "2", "status": 400, "error": {"type": "mapper_parsing_exception", "reason": "failed to parse"}}}
                ]
            }"#,
        )
        .unwrap();

        assert!(response.errors);
        let reasons = bulk_item_errors(&response.items);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("document 2"));
        assert!(reasons[0].contains("mapper_parsing_exception"));
    }

    #[test]
    fn test_search_response_decodes() {
        let raw = r#"{
            "took": 2,
            "hits": {
                "total": {"value": 42, "relation": "eq"},
                "hits": [
                    {"_index": "places", "_id": "1", "_source": {
                        "id": 1, "name": "A", "address": "B", "phone": "C",
                        "location": {"lat": 55.0, "lon": 37.0}
                    }}
                ]
            }
        }"#;

        let decoded: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(decoded.hits.total.value, 42);

        let places = collect_places(decoded.hits.hits);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, 1);
    }

    #[test]
    fn test_malformed_response_shape_is_an_error() {
        // no hits.total object
        let raw = r#"{"hits": {"hits": []}}"#;
        assert!(serde_json::from_str::<SearchResponse>(raw).is_err());

        // hits is not an object at all
        let raw = r#"{"hits": 3}"#;
        assert!(serde_json::from_str::<SearchResponse>(raw).is_err());
    }

    #[test]
    fn test_undecodable_document_is_skipped() {
        let raw = r#"{
            "hits": {
                "total": {"value": 2},
                "hits": [
                    {"_source": {"id": 1, "name": "A", "address": "B", "phone": "C",
                                 "location": {"lat": 55.0, "lon": 37.0}}},
                    {"_source": {"id": "not-an-integer"}}
                ]
            }
        }"#;

        let decoded: SearchResponse = serde_json::from_str(raw).unwrap();
        let places = collect_places(decoded.hits.hits);

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, 1);
    }

    #[test]
    fn test_empty_result_set_decodes_to_empty_page() {
        let raw = r#"{"hits": {"total": {"value": 0}, "hits": []}}"#;

        let decoded: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(decoded.hits.total.value, 0);
        assert!(collect_places(decoded.hits.hits).is_empty());
    }
}
