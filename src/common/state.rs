// Application state shared across all modules

use std::sync::Arc;

use crate::auth::tokens::TokenAuthority;
use crate::services::{CatalogService, SearchStore};

/// Application state containing the shared search client, the catalog
/// facade built over it, and the token authority.
///
/// Everything in here is read-only after startup, so handlers receive it
/// as a plain `Extension(Arc<AppState>)` without any locking.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchStore>,
    pub catalog: CatalogService,
    pub tokens: TokenAuthority,
}
