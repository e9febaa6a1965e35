// src/common/config.rs
//! Runtime configuration resolved once at startup

use std::env;

/// Service configuration read from the environment, with a CLI override
/// for the recommendation gate.
#[derive(Debug, Clone)]
pub struct Config {
    pub elasticsearch_url: String,
    pub places_file: String,
    pub jwt_secret: String,
    pub require_token: bool,
    pub port: u16,
    pub cors_origins: String,
}

impl Config {
    pub fn from_env() -> Self {
        let elasticsearch_url = env::var("ELASTICSEARCH_URL")
            .unwrap_or_else(|_| "http://localhost:9200".to_string());

        let places_file =
            env::var("PLACES_FILE").unwrap_or_else(|_| "./data/places.tsv".to_string());

        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());

        let require_token = env::var("REQUIRE_TOKEN")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8888);

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

        Self {
            elasticsearch_url,
            places_file,
            jwt_secret,
            require_token,
            port,
            cors_origins,
        }
    }
}

/// CLI argument parsing for the recommendation gate
pub fn parse_gate_args() -> Option<bool> {
    let args: Vec<String> = env::args().collect();

    for arg in &args {
        match arg.as_str() {
            "--token" | "-t" => return Some(true),
            "--no-token" => return Some(false),
            _ => {}
        }
    }

    None
}

/// Override the gate setting from CLI args
pub fn apply_cli_override(mut config: Config) -> Config {
    if let Some(require_token) = parse_gate_args() {
        tracing::info!(require_token, "CLI override for recommendation gate");
        config.require_token = require_token;
    }

    config
}
