//! CORS middleware construction
//!
//! Built once per worker from `server.cors`. The default config allows any
//! origin so a browser frontend on another host can call the API.

use actix_cors::Cors;
use actix_web::http::Method;
use tracing::{error, warn};

use crate::config::CorsConfig;

fn is_any_origin(cors_config: &CorsConfig) -> bool {
    cors_config.allowed_origins.iter().any(|o| o == "*")
}

/// Log risky or useless CORS combinations at startup
pub fn validate_cors_config(cors_config: &CorsConfig) {
    if !cors_config.enabled {
        return;
    }

    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Use [\"*\"] for any origin."
        );
    }

    if is_any_origin(cors_config) && cors_config.allow_credentials {
        error!(
            "allow_credentials is ignored together with any-origin CORS; \
            list the allowed origins explicitly to send credentials"
        );
    }
}

/// Build the `Cors` middleware from configuration
///
/// Disabled CORS falls back to `Cors::default()`, i.e. the browser's
/// same-origin policy.
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    if !cors_config.enabled {
        return Cors::default();
    }

    let any_origin = is_any_origin(cors_config);
    let mut cors = Cors::default();

    if any_origin {
        cors = cors.allow_any_origin();
    } else {
        // Empty list leaves only same-origin requests
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    if !methods.is_empty() {
        cors = cors.allowed_methods(methods);
    }

    for header in &cors_config.allowed_headers {
        cors = cors.allowed_header(header.as_str());
    }

    cors = cors.max_age(cors_config.max_age as usize);

    // Credentials with a wildcard origin would let any site act for the user
    if cors_config.allow_credentials && !any_origin {
        cors = cors.supports_credentials();
    }

    cors
}
