// src/services/catalog.rs

use std::sync::Arc;

use super::search::{SearchError, SearchStore};
use crate::places::models::Place;

/// Read-only listing facade over the shared [`SearchStore`].
///
/// Holds no state and caches nothing; every call is a live round-trip to
/// the index. Handlers that only list places depend on this rather than on
/// the full store client.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: Arc<SearchStore>,
}

impl CatalogService {
    pub fn new(store: Arc<SearchStore>) -> Self {
        Self { store }
    }

    /// Returns one page of places ordered by id, plus the exact total
    /// count across the whole collection.
    pub async fn get_places(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Place>, usize), SearchError> {
        self.store.list_places(limit, offset).await
    }
}
