// src/main.rs
use anyhow::Context;
use axum::{extract::Extension, Router};
use dotenv::dotenv;
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod common;
mod places;
mod services;

use auth::{auth_routes, TokenAuthority};
use common::config::{apply_cli_override, Config};
use common::AppState;
use places::{loader, places_routes};
use services::{CatalogService, SearchStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // CONFIGURATION
    // ========================================================================

    let config = apply_cli_override(Config::from_env());
    info!(
        elasticsearch_url = %config.elasticsearch_url,
        places_file = %config.places_file,
        require_token = config.require_token,
        "Configuration loaded"
    );

    // ========================================================================
    // DOCUMENT STORE SETUP
    // ========================================================================

    // One shared HTTP client; every component that talks to the index
    // goes through this store instance. No retries: a failed call is
    // surfaced to the caller as-is.
    let http_client = Client::builder()
        .no_proxy()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let search = Arc::new(SearchStore::new(http_client, config.elasticsearch_url.clone()));

    search
        .ping()
        .await
        .context("search cluster is unreachable")?;

    search
        .ensure_schema()
        .await
        .context("failed to create index")?;

    // ========================================================================
    // DATA LOAD
    // ========================================================================

    let places = loader::load_places(&config.places_file)
        .with_context(|| format!("failed to load places from {}", config.places_file))?;
    info!(count = places.len(), "Loaded places from source file");

    search
        .bulk_load(&places)
        .await
        .context("failed to bulk load places")?;

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        search: search.clone(),
        catalog: CatalogService::new(search),
        tokens: TokenAuthority::new(config.jwt_secret.clone()),
    };

    let shared = Arc::new(app_state);

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        .merge(places_routes(config.require_token))
        .merge(auth_routes())
        .layer(Extension(shared))
        .layer({
            let origins: Vec<axum::http::HeaderValue> = config
                .cors_origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
        })
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
