//! Server mode
//!
//! Configures and starts the HTTP server with all routes.

use actix_web::{App, HttpServer, middleware::Compress};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::warn;

use crate::api::middleware::{RequestIdMiddleware, build_cors_middleware, validate_cors_config};
use crate::api::services::app_routes;
use crate::config::StaticConfig;
use crate::runtime::startup::prepare_server_startup;

/// Run the HTTP server until it stops or receives Ctrl+C
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let startup = prepare_server_startup(&config);
    let api_state = startup.api_state;

    let workers = config.server.workers.clamp(1, 32);
    warn!("Using {} worker threads for the server", workers);

    if !config.server.trusted_proxies.is_empty() {
        warn!(
            "Rate limiting trusts X-Forwarded-For from: {:?}",
            config.server.trusted_proxies
        );
    }

    let cors_config = config.server.cors.clone();
    validate_cors_config(&cors_config);
    if cors_config.enabled {
        warn!("CORS enabled for origins: {:?}", cors_config.allowed_origins);
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(build_cors_middleware(&cors_config))
            .wrap(RequestIdMiddleware)
            .configure(app_routes(api_state.clone()))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);

    // actix handles SIGINT/SIGTERM; in-memory data is dropped with the process
    server.run().await.context("HTTP server error")?;

    warn!(
        "Server stopped, {} links and {} rate windows discarded",
        startup.link_service.count().await.unwrap_or_default(),
        startup.limiter.tracked_clients()
    );

    Ok(())
}
